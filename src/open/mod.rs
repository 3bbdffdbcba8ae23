//! Opening downloads as temporary editor tabs.
//!
//! # Architecture
//!
//! - [`TempTab`] - A downloaded file open in an editor, tagged with its URL
//! - [`Host`] - Async trait for the editor hosting the tab
//! - [`ExternalEditor`] - Runs an editor process; the tab closes when it exits
//!
//! A tab still carrying its URL tag when it closes has its file removed. A
//! save drops the tag, handing the file over to the user.

mod editor;
mod error;
mod host;
mod tab;

pub use editor::{EDITOR_URL_ENV, ExternalEditor, content_digest};
pub use error::HostError;
pub use host::Host;
pub use tab::{CloseOutcome, TempTab};
