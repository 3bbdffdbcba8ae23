//! URL detection in editor text.
//!
//! This module finds the URL sitting under a point in a buffer, the way an
//! editor context command would: the line around the point is scanned with a
//! URL pattern and the match touching the point wins. A non-empty selection
//! can optionally stand in for the URL.
//!
//! # Example
//!
//! ```
//! use url_downloader::parser::url_at;
//!
//! let text = "docs live at https://example.com/guide.html now";
//! assert_eq!(url_at(text, 20), Some("https://example.com/guide.html"));
//! assert_eq!(url_at(text, 2), None);
//! ```

mod error;
mod position;
mod selection;
mod url;

pub use error::PositionError;
pub use position::TextPosition;
pub use selection::{DESCRIPTION_URL_LIMIT, Selection, describe, find_url};
pub use url::{SCAN_RADIUS, url_at};
