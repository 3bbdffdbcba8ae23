//! Exit code logic for the url-downloader process.
//!
//! Single responsibility: map command outcomes to the process exit outcome.

use url_downloader::CommandOutcome;

use crate::ProcessExit;

/// A tab that opened is a success whatever happened to its file afterwards.
pub(crate) fn exit_for_outcome(outcome: &CommandOutcome) -> ProcessExit {
    match outcome {
        CommandOutcome::Opened(_) => ProcessExit::Success,
        CommandOutcome::Failed => ProcessExit::Failure,
    }
}

/// `None` means no URL was found at the requested position.
pub(crate) fn exit_for_context_outcome(outcome: Option<&CommandOutcome>) -> ProcessExit {
    outcome.map_or(ProcessExit::Failure, exit_for_outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use url_downloader::CloseOutcome;

    #[test]
    fn test_exit_outcome_success_when_opened() {
        let outcome = CommandOutcome::Opened(CloseOutcome::Removed);
        assert_eq!(exit_for_outcome(&outcome), ProcessExit::Success);

        let outcome = CommandOutcome::Opened(CloseOutcome::Kept(PathBuf::from("/tmp/a.txt")));
        assert_eq!(exit_for_outcome(&outcome), ProcessExit::Success);
    }

    #[test]
    fn test_exit_outcome_failure_when_failed() {
        assert_eq!(exit_for_outcome(&CommandOutcome::Failed), ProcessExit::Failure);
    }

    #[test]
    fn test_exit_outcome_failure_when_no_url_found() {
        assert_eq!(exit_for_context_outcome(None), ProcessExit::Failure);
        assert_eq!(
            exit_for_context_outcome(Some(&CommandOutcome::Opened(CloseOutcome::Missing))),
            ProcessExit::Success
        );
    }
}
