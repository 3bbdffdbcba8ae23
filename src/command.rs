//! The download-and-open commands.
//!
//! [`UrlDownloadCommand`] takes a URL, downloads it on a background task and
//! opens the result in a temporary tab. [`UrlDownloadContextCommand`] finds
//! the URL in a buffer first (at a click point, the caret, or the selection).

use std::fmt::Display;
use std::path::PathBuf;

use tracing::{debug, info, instrument, warn};

use crate::config::Settings;
use crate::download::{DownloadError, DownloadedFile, HttpClient};
use crate::open::{CloseOutcome, Host, TempTab};
use crate::parser::{self, Selection};

/// How a command run ended. Failures have already been reported to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The file was opened and its tab has closed.
    Opened(CloseOutcome),
    /// The download or the tab failed.
    Failed,
}

/// Prefixes `default_protocol` to URLs that start with neither `http` nor
/// `file`.
///
/// # Examples
///
/// ```
/// use url_downloader::normalize_url;
///
/// assert_eq!(normalize_url("www.rust-lang.org", "http://"), "http://www.rust-lang.org");
/// assert_eq!(normalize_url("https://a.io/", "http://"), "https://a.io/");
/// ```
#[must_use]
pub fn normalize_url(url: &str, default_protocol: &str) -> String {
    if url.starts_with("http") || url.starts_with("file") {
        url.to_string()
    } else {
        format!("{default_protocol}{url}")
    }
}

/// Formats the error dialog shown for a failed download.
#[must_use]
pub fn error_report(url: &str, err: &dyn Display) -> String {
    format!("Error while downloading:\n{url}:\n\n{err}")
}

/// Downloads a URL and opens it in a temporary tab.
#[derive(Debug, Clone)]
pub struct UrlDownloadCommand {
    settings: Settings,
    client: HttpClient,
    previous_url: Option<String>,
}

impl UrlDownloadCommand {
    /// Creates a command with an HTTP client built from the settings'
    /// timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Client`] when the HTTP client cannot be built.
    pub fn new(settings: Settings) -> Result<Self, DownloadError> {
        let client = HttpClient::try_new_with_timeouts(
            settings.connect_timeout_secs,
            settings.read_timeout_secs,
        )?;
        Ok(Self::with_client(settings, client))
    }

    /// Creates a command using `client` for downloads.
    #[must_use]
    pub fn with_client(settings: Settings, client: HttpClient) -> Self {
        Self {
            settings,
            client,
            previous_url: None,
        }
    }

    /// Settings this command runs with.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The last URL this command was run with, after normalization.
    ///
    /// Hosts that prompt for a URL use it to pre-fill the prompt.
    #[must_use]
    pub fn previous_url(&self) -> Option<&str> {
        self.previous_url.as_deref()
    }

    /// Downloads `url`, opens it through `host` and cleans up once the tab
    /// closes.
    ///
    /// Failures are shown as one error dialog naming the URL.
    #[instrument(skip(self, host))]
    pub async fn run(&mut self, host: &dyn Host, url: &str) -> CommandOutcome {
        let url = normalize_url(url, &self.settings.default_protocol);
        let file = match self.download(host, &url).await {
            Ok(file) => file,
            Err(report) => {
                host.error_message(&report);
                return CommandOutcome::Failed;
            }
        };

        let mut tab = TempTab::new(file.path, url.as_str(), self.settings.show_url);
        if let Err(e) = host.open_tab(&mut tab).await {
            warn!(error = %e, "failed to open tab");
            host.error_message(&error_report(&url, &e));
            let cleanup = tab.close();
            debug!(?cleanup, "cleaned up after failed open");
            return CommandOutcome::Failed;
        }

        CommandOutcome::Opened(tab.close())
    }

    /// Downloads `url` without opening it. The file is kept and its path
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns the formatted error report, which has already been shown
    /// through `host`.
    #[instrument(skip(self, host))]
    pub async fn fetch(&mut self, host: &dyn Host, url: &str) -> Result<PathBuf, String> {
        let url = normalize_url(url, &self.settings.default_protocol);
        match self.download(host, &url).await {
            Ok(file) => {
                info!(path = %file.path.display(), "kept downloaded file");
                Ok(file.path)
            }
            Err(report) => {
                host.error_message(&report);
                Err(report)
            }
        }
    }

    /// Runs the download on its own task so the host keeps reporting while
    /// it is in flight. Errors come back as ready-to-show reports.
    async fn download(&mut self, host: &dyn Host, url: &str) -> Result<DownloadedFile, String> {
        self.previous_url = Some(url.to_string());
        host.status_message(&format!("Downloading: {url}"));

        let client = self.client.clone();
        let dir = self.settings.temp_dir();
        let task_url = url.to_string();
        let task = tokio::spawn(async move { client.download_to_temp(&task_url, &dir).await });

        match task.await {
            Ok(Ok(file)) => Ok(file),
            Ok(Err(e)) => {
                warn!(error = %e, "download failed");
                Err(error_report(url, &e))
            }
            Err(e) => {
                warn!(error = %e, "download task did not complete");
                Err(error_report(url, &e))
            }
        }
    }
}

/// The context-menu flavor: finds the URL in a buffer, then downloads it.
#[derive(Debug, Clone)]
pub struct UrlDownloadContextCommand {
    command: UrlDownloadCommand,
}

impl UrlDownloadContextCommand {
    /// Wraps `command`; its settings decide whether selections count as URLs.
    #[must_use]
    pub fn new(command: UrlDownloadCommand) -> Self {
        Self { command }
    }

    /// The wrapped command.
    #[must_use]
    pub fn command(&self) -> &UrlDownloadCommand {
        &self.command
    }

    /// Finds the URL under `point` (or the caret), or the selected text when
    /// `open_selection` is on.
    #[must_use]
    pub fn find_url(&self, text: &str, selection: Selection, point: Option<usize>) -> Option<String> {
        parser::find_url(text, selection, point, self.command.settings.open_selection)
    }

    /// Returns true when there is a URL to act on.
    #[must_use]
    pub fn is_visible(&self, text: &str, selection: Selection, point: Option<usize>) -> bool {
        self.find_url(text, selection, point).is_some()
    }

    /// Same as [`Self::is_visible`].
    #[must_use]
    pub fn is_enabled(&self, text: &str, selection: Selection, point: Option<usize>) -> bool {
        self.is_visible(text, selection, point)
    }

    /// Menu caption for the URL found, if any.
    #[must_use]
    pub fn description(
        &self,
        text: &str,
        selection: Selection,
        point: Option<usize>,
    ) -> Option<String> {
        self.find_url(text, selection, point)
            .map(|url| parser::describe(&url))
    }

    /// Downloads and opens the URL found in `text`. Returns `None` when there
    /// is none.
    pub async fn run(
        &mut self,
        host: &dyn Host,
        text: &str,
        selection: Selection,
        point: Option<usize>,
    ) -> Option<CommandOutcome> {
        let Some(url) = self.find_url(text, selection, point) else {
            debug!("no URL at position");
            return None;
        };
        Some(self.command.run(host, &url).await)
    }
}
