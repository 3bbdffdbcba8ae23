//! Constants for the download module (timeouts, naming).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large files).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Name used when a URL has no path to take a filename from.
pub const INDEX_FILENAME: &str = "index.html";

/// MIME type assumed when a response carries no `Content-Type`.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Longest stem kept for a temp filename, in characters.
pub const MAX_STEM_CHARS: usize = 100;
