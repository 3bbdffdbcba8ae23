//! URL Downloader Core Library
//!
//! Finds the URL under a cursor (or in a selection), downloads it to a
//! temporary file and hands that file to an editor, removing it again when
//! the editor tab closes.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`parser`] - URL detection around a point in text
//! - [`download`] - Temp filename derivation and the one-shot download
//! - [`open`] - Temporary tabs and the editor host abstraction
//! - [`command`] - The download/open commands tying it all together
//! - [`config`] - Settings and config file loading

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod command;
pub mod config;
pub mod download;
pub mod open;
pub mod parser;
mod user_agent;

// Re-export commonly used types
pub use command::{CommandOutcome, UrlDownloadCommand, UrlDownloadContextCommand, normalize_url};
pub use config::Settings;
pub use download::{DownloadError, DownloadedFile, HttpClient};
pub use open::{CloseOutcome, ExternalEditor, Host, HostError, TempTab};
pub use parser::{Selection, TextPosition, describe, find_url, url_at};
