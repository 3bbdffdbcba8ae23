//! Terminal host: spinner for status, stderr for errors, an editor process
//! for tabs.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use url_downloader::{ExternalEditor, Host, HostError, TempTab};

pub(crate) struct TerminalHost {
    editor: Option<String>,
    use_spinner: bool,
    spinner: Mutex<Option<ProgressBar>>,
}

impl TerminalHost {
    /// `editor` is the configured command; `$VISUAL`/`$EDITOR` fill in when
    /// it is `None`.
    pub(crate) fn new(editor: Option<String>, use_spinner: bool) -> Self {
        Self {
            editor,
            use_spinner,
            spinner: Mutex::new(None),
        }
    }

    /// Stops and clears the spinner, if one is running.
    pub(crate) fn clear_status(&self) {
        if let Some(spinner) = self.slot().take() {
            spinner.finish_and_clear();
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.spinner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn new_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[async_trait]
impl Host for TerminalHost {
    fn status_message(&self, message: &str) {
        if !self.use_spinner {
            info!("{message}");
            return;
        }
        self.slot()
            .get_or_insert_with(new_spinner)
            .set_message(message.to_string());
    }

    fn error_message(&self, message: &str) {
        self.clear_status();
        eprintln!("{message}");
    }

    async fn open_tab(&self, tab: &mut TempTab) -> Result<(), HostError> {
        self.clear_status();
        let editor = ExternalEditor::resolve(self.editor.as_deref())?;
        if let Some(status) = tab.status() {
            eprintln!("{status}");
        }
        editor.edit(tab).await
    }
}

impl Drop for TerminalHost {
    fn drop(&mut self) {
        self.clear_status();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_without_spinner_keeps_slot_empty() {
        let host = TerminalHost::new(None, false);
        host.status_message("Downloading: http://example.com");
        assert!(host.slot().is_none());
    }

    #[test]
    fn test_status_with_spinner_reuses_one_bar() {
        let host = TerminalHost::new(None, true);
        host.status_message("Downloading: http://a.example");
        host.status_message("Downloading: http://b.example");
        assert_eq!(
            host.slot().as_ref().map(ProgressBar::message).as_deref(),
            Some("Downloading: http://b.example")
        );
        host.error_message("Error while downloading:\nhttp://b.example:\n\nboom");
        assert!(host.slot().is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_open_tab_runs_configured_editor() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("page_q.txt");
        std::fs::write(&path, "text").unwrap();
        let mut tab = TempTab::new(&path, "https://example.com/page.txt", true);

        let host = TerminalHost::new(Some("true".to_string()), false);
        host.open_tab(&mut tab).await.unwrap();
        assert!(tab.is_temporary());
    }
}
