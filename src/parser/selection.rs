//! Selection-aware URL lookup and command descriptions.

use tracing::debug;

use super::url::url_at;

/// Longest URL shown verbatim in a command description.
pub const DESCRIPTION_URL_LIMIT: usize = 64;

/// A selection in a text buffer, as byte offsets.
///
/// `head` is where the caret sits; `anchor` is where the selection started.
/// Equal offsets mean a bare cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    /// Offset where the selection was started.
    pub anchor: usize,
    /// Offset of the caret.
    pub head: usize,
}

impl Selection {
    /// A bare cursor at `offset`.
    #[must_use]
    pub fn cursor(offset: usize) -> Self {
        Self {
            anchor: offset,
            head: offset,
        }
    }

    /// A selection from `anchor` to `head`.
    #[must_use]
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// Returns true when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// Returns the selected slice of `text`, or `None` if the selection does
    /// not fall on character boundaries inside `text`.
    #[must_use]
    pub fn text<'a>(&self, text: &'a str) -> Option<&'a str> {
        let start = self.anchor.min(self.head);
        let end = self.anchor.max(self.head);
        text.get(start..end)
    }
}

/// Finds the URL a context command should act on.
///
/// When `open_selection` is set and the selection is not empty, the selected
/// text itself is taken as the URL (surrounding whitespace trimmed). Otherwise
/// the text is scanned at `point`, which is a context-menu click position when
/// given and the caret otherwise.
#[must_use]
pub fn find_url(
    text: &str,
    selection: Selection,
    point: Option<usize>,
    open_selection: bool,
) -> Option<String> {
    if open_selection && !selection.is_empty() {
        let selected = selection.text(text).map(str::trim).filter(|s| !s.is_empty());
        if let Some(selected) = selected {
            debug!(url = %selected, "using selection as URL");
            return Some(selected.to_string());
        }
    }

    let point = point.unwrap_or(selection.head);
    url_at(text, point).map(ToString::to_string)
}

/// Builds the menu caption for a download of `url`.
///
/// # Examples
///
/// ```
/// use url_downloader::parser::describe;
///
/// assert_eq!(
///     describe("https://example.com/a.txt"),
///     "Download and open https://example.com/a.txt"
/// );
/// ```
#[must_use]
pub fn describe(url: &str) -> String {
    match url.char_indices().nth(DESCRIPTION_URL_LIMIT) {
        Some((cut, _)) => format!("Download and open {}...", &url[..cut]),
        None => format!("Download and open {url}"),
    }
}
