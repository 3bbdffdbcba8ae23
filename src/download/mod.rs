//! One-shot downloads into temp files.
//!
//! This module fetches a single URL into a temporary file whose name mirrors
//! the URL's filename, so an editor opening it picks a sensible mode.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large files)
//! - Temp filenames derived from the URL path, with the extension taken from
//!   the `Content-Type` when the path has none
//! - Configurable timeouts (30s connect, 5min read by default)
//! - Truncated transfers detected against `Content-Length`
//! - `file:` URLs copied like any other download
//!
//! # Example
//!
//! ```no_run
//! use url_downloader::download::HttpClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let file = client
//!     .download_to_temp("https://example.com/index.html", &std::env::temp_dir())
//!     .await?;
//! println!("Downloaded: {}", file.path.display());
//! # Ok(())
//! # }
//! ```

mod client;
pub mod constants;
mod error;
mod filename;

pub use client::{DownloadedFile, HttpClient};
pub use error::DownloadError;
pub use filename::{TempName, extension_for_mime, mime_for_path, temp_name};

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.
