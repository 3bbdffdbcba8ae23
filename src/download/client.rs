//! HTTP client wrapper for one-shot downloads into temp files.
//!
//! This module provides the `HttpClient` struct which streams a response body
//! into a freshly created temp file and only hands the file out once the body
//! has been written completely.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, DEFAULT_CONTENT_TYPE, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use super::filename::{TempName, extension_for_mime, mime_for_path, temp_name};
use crate::user_agent;

/// HTTP client for downloading a URL into a temp file.
///
/// # Example
///
/// ```no_run
/// use url_downloader::download::HttpClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let file = client
///     .download_to_temp("https://example.com/notes.txt", &std::env::temp_dir())
///     .await?;
/// println!("Downloaded to: {}", file.path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

/// A completed download sitting in a temp file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    /// Path of the temp file holding the body.
    pub path: PathBuf,
    /// URL the body came from.
    pub url: String,
    /// Content type the name was derived from.
    pub content_type: String,
    /// Bytes written to disk.
    pub bytes: u64,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Read timeout: 5 minutes (for large files)
    /// - Gzip decompression: enabled
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails. Use
    /// [`HttpClient::try_new_with_timeouts`] to handle that case.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        Self::try_new_with_timeouts(connect_timeout_secs, read_timeout_secs)
            .expect("failed to build HTTP client with static configuration")
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Client`] when the builder fails, for
    /// instance because the TLS backend cannot be initialized.
    pub fn try_new_with_timeouts(
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()
            .map_err(DownloadError::client)?;
        Ok(Self { client })
    }

    /// Downloads `url` into a new temp file inside `dir`.
    ///
    /// The temp file is named `<stem>_<random><ext>` after the URL's filename
    /// (see [`temp_name`]); `http`, `https` and `file` URLs are accepted.
    /// Nothing is left behind on failure.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid or its scheme is unsupported
    /// - The request fails (network error, timeout)
    /// - The server returns an error status (4xx, 5xx)
    /// - The body is shorter than the announced `Content-Length`
    /// - Creating or writing the temp file fails
    #[must_use = "the download result holds the temp file path"]
    #[instrument(skip(self, dir), fields(url = %url))]
    pub async fn download_to_temp(
        &self,
        url: &str,
        dir: &Path,
    ) -> Result<DownloadedFile, DownloadError> {
        debug!("starting download");

        let parsed =
            Url::parse(url).map_err(|e| DownloadError::invalid_url(url, e.to_string()))?;

        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| DownloadError::io(dir, e))?;

        let downloaded = match parsed.scheme() {
            "http" | "https" => self.fetch_http(url, &parsed, dir).await?,
            "file" => fetch_local(url, &parsed, dir).await?,
            scheme => return Err(DownloadError::unsupported_scheme(url, scheme)),
        };

        info!(
            path = %downloaded.path.display(),
            bytes = downloaded.bytes,
            content_type = %downloaded.content_type,
            "download complete"
        );
        Ok(downloaded)
    }

    async fn fetch_http(
        &self,
        url: &str,
        parsed: &Url,
        dir: &Path,
    ) -> Result<DownloadedFile, DownloadError> {
        let response = self.send_request(url).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let expected = response.content_length();
        let name = temp_name(parsed, extension_for_mime(&content_type));
        debug!(?name, ?expected, content_type = %content_type, "resolved temp name");

        let (file, temp_path) = create_temp_file(dir, &name)?;
        let bytes = stream_to_file(file, response, url, &temp_path, expected).await?;
        if let Some(expected) = expected
            && bytes < expected
        {
            return Err(DownloadError::truncated(url, expected, bytes));
        }

        Ok(DownloadedFile {
            path: keep(temp_path)?,
            url: url.to_string(),
            content_type,
            bytes,
        })
    }

    async fn send_request(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                DownloadError::timeout(url)
            } else {
                DownloadError::network(url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "server returned error status");
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        Ok(response)
    }
}

/// Copies a local `file:` URL into a temp file.
async fn fetch_local(
    url: &str,
    parsed: &Url,
    dir: &Path,
) -> Result<DownloadedFile, DownloadError> {
    let source = parsed
        .to_file_path()
        .map_err(|()| DownloadError::invalid_url(url, "not a local file path"))?;
    let content_type = mime_for_path(&source);
    let name = temp_name(parsed, extension_for_mime(content_type));

    let mut input = File::open(&source)
        .await
        .map_err(|e| DownloadError::io(&source, e))?;
    let (file, temp_path) = create_temp_file(dir, &name)?;
    let mut writer = BufWriter::new(file);
    let bytes = tokio::io::copy(&mut input, &mut writer)
        .await
        .map_err(|e| DownloadError::io(&source, e))?;
    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(temp_path.to_path_buf(), e))?;

    Ok(DownloadedFile {
        path: keep(temp_path)?,
        url: url.to_string(),
        content_type: content_type.to_string(),
        bytes,
    })
}

/// Creates `<prefix><random><suffix>` in `dir`. The returned `TempPath`
/// deletes the file when dropped, so any early return cleans up.
fn create_temp_file(dir: &Path, name: &TempName) -> Result<(File, TempPath), DownloadError> {
    let prefix = name.prefix();
    let named = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(name.suffix())
        .tempfile_in(dir)
        .map_err(|e| DownloadError::io(dir.join(format!("{prefix}*{}", name.suffix())), e))?;
    let (file, temp_path) = named.into_parts();
    debug!(path = %temp_path.display(), "created temp file");
    Ok((File::from_std(file), temp_path))
}

fn keep(temp_path: TempPath) -> Result<PathBuf, DownloadError> {
    temp_path.keep().map_err(|e| {
        let path = e.path.to_path_buf();
        DownloadError::io(path, e.error)
    })
}

/// Streams response body to file, returning bytes written.
///
/// A body error after fewer bytes than `expected` is reported as a truncated
/// transfer rather than a generic network failure.
async fn stream_to_file(
    file: File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
    expected: Option<u64>,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = match chunk_result {
            Ok(chunk) => chunk,
            Err(e) => {
                return Err(match expected {
                    Some(expected) if bytes_written < expected => {
                        debug!(error = %e, bytes_written, expected, "body ended early");
                        DownloadError::truncated(url, expected, bytes_written)
                    }
                    _ if e.is_timeout() => DownloadError::timeout(url),
                    _ => DownloadError::network(url, e),
                });
            }
        };

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

        bytes_written += chunk.len() as u64;
    }

    // Ensure all data is flushed to disk
    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}
