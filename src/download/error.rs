//! Error types for the download module.
//!
//! Every variant keeps the URL it failed on so callers can report it next to
//! the message without threading extra state around.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while downloading a URL to a temp file.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP client could not be built (e.g. TLS backend or proxy setup).
    #[error("failed to build HTTP client: {source}")]
    Client {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timed out waiting for the server")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP Error {status}: {reason}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status.
        reason: String,
    },

    /// File system error (creating, writing or reading a file).
    #[error("IO error on {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The provided URL is malformed.
    #[error("invalid URL: {reason}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// The URL parsed but its scheme cannot be fetched.
    #[error("unknown url type: {scheme}")]
    UnsupportedScheme {
        /// The rejected URL.
        url: String,
        /// The scheme that is not supported.
        scheme: String,
    },

    /// The body ended before the announced `Content-Length`.
    #[error(
        "The server sent only a partial response ({received} of {expected} bytes)"
    )]
    Truncated {
        /// The URL whose body was cut short.
        url: String,
        /// Bytes announced by the server.
        expected: u64,
        /// Bytes actually received.
        received: u64,
    },
}

impl DownloadError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error, filling in the canonical reason phrase.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("Unknown Status")
            .to_string();
        Self::HttpStatus {
            url: url.into(),
            status,
            reason,
        }
    }

    /// Creates a client construction error.
    #[must_use]
    pub fn client(source: reqwest::Error) -> Self {
        Self::Client { source }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unsupported scheme error.
    pub fn unsupported_scheme(url: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self::UnsupportedScheme {
            url: url.into(),
            scheme: scheme.into(),
        }
    }

    /// Creates a truncated-transfer error.
    pub fn truncated(url: impl Into<String>, expected: u64, received: u64) -> Self {
        Self::Truncated {
            url: url.into(),
            expected,
            received,
        }
    }

    /// The URL the error relates to, when it has one.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Network { url, .. }
            | Self::Timeout { url }
            | Self::HttpStatus { url, .. }
            | Self::InvalidUrl { url, .. }
            | Self::UnsupportedScheme { url, .. }
            | Self::Truncated { url, .. } => Some(url),
            Self::Io { .. } | Self::Client { .. } => None,
        }
    }
}

// No `From<reqwest::Error>` / `From<std::io::Error>`: every variant needs the
// URL or path, which the source errors do not carry.
