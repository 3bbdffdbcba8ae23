//! A downloaded file open in an editor tab.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

/// What happened to a tab's file when the tab closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The temp file was deleted.
    Removed,
    /// The file stays on disk: it was saved, or deleting it failed.
    Kept(PathBuf),
    /// The file was already gone.
    Missing,
}

/// A file opened from a download.
///
/// While the tab carries its associated URL it is temporary: closing it
/// deletes the file. Saving drops the tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempTab {
    path: PathBuf,
    url: Option<String>,
    status: Option<String>,
}

impl TempTab {
    /// Creates a tab for `path` downloaded from `url`.
    ///
    /// With `show_url`, the tab carries a `[URL: <url>]` status.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, url: impl Into<String>, show_url: bool) -> Self {
        let url = url.into();
        let status = show_url.then(|| format!("[URL: {url}]"));
        Self {
            path: path.into(),
            url: Some(url),
            status,
        }
    }

    /// Path of the file shown in the tab.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// URL the file was downloaded from, while the tab is still temporary.
    #[must_use]
    pub fn associated_url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Status text shown with the tab, if any.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Returns true while closing the tab will delete its file.
    #[must_use]
    pub fn is_temporary(&self) -> bool {
        self.url.is_some()
    }

    /// Called before the user saves the file: it stops being temporary.
    pub fn on_pre_save(&mut self) {
        if self.url.take().is_some() {
            debug!(path = %self.path.display(), "tab saved, file handed over to user");
        }
        self.status = None;
    }

    /// Closes the tab, deleting its file if it is still temporary.
    ///
    /// Deletion failures are logged and otherwise ignored.
    #[must_use = "the outcome tells whether the file is still on disk"]
    pub fn close(self) -> CloseOutcome {
        if !self.is_temporary() {
            info!(path = %self.path.display(), "keeping saved file");
            return CloseOutcome::Kept(self.path);
        }

        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "removed temp file");
                CloseOutcome::Removed
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "temp file already gone");
                CloseOutcome::Missing
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to remove temp file");
                CloseOutcome::Kept(self.path)
            }
        }
    }
}
