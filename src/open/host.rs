//! The editor host abstraction.

use async_trait::async_trait;

use super::error::HostError;
use super::tab::TempTab;

/// An editor that can show status, report errors and open tabs.
///
/// Implementations must be shareable across tasks; the download itself runs
/// on a separate task while the host keeps reporting.
#[async_trait]
pub trait Host: Send + Sync {
    /// Shows a transient status line (e.g. `Downloading: <url>`).
    fn status_message(&self, message: &str);

    /// Shows an error dialog.
    fn error_message(&self, message: &str);

    /// Opens `tab` and returns once the user has closed it.
    ///
    /// A host that sees the user save the file calls
    /// [`TempTab::on_pre_save`] before returning.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] when the tab cannot be opened.
    async fn open_tab(&self, tab: &mut TempTab) -> Result<(), HostError>;
}
