//! URL pattern matching around a point in text.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

/// Number of characters scanned on either side of the point.
pub const SCAN_RADIUS: usize = 1024;

/// Regex pattern for URLs embedded in prose or code.
///
/// Accepts `http(s)://` with a dotted host or `localhost`, or a bare `www.`
/// host, then an optional path/query run that must end on a character that
/// is unlikely to be sentence punctuation.
#[allow(clippy::expect_used)]
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\b(?:",
        r"https?://(?:(?:[\w\d\-]+(?:\.[\w\d\-.]+)+)|localhost)",
        r"|",
        r"www\.[\w\d\-]+(?:\.[\w\d\-.]+)+",
        r")",
        r#"/?[\w\d\-.?,!'(){}\[\]/+&@%$#=:"|~;]*"#,
        r"[\w\d\-~:/#@$*+=]",
    ))
    .expect("URL regex is valid") // Static pattern, safe to panic
});

/// Returns the URL under `point` (a byte offset into `text`), if any.
///
/// Only the line holding the point is considered, and at most
/// [`SCAN_RADIUS`] characters of it on each side of the point. A match counts
/// when the point lies anywhere from its first character up to just past its
/// last one, so a cursor parked at the end of a URL still finds it.
///
/// Offsets beyond the text are clamped to its end; offsets inside a
/// multi-byte character snap back to the start of that character.
///
/// # Examples
///
/// ```
/// use url_downloader::parser::url_at;
///
/// let text = "see www.rust-lang.org";
/// assert_eq!(url_at(text, text.len()), Some("www.rust-lang.org"));
/// ```
#[must_use]
pub fn url_at(text: &str, point: usize) -> Option<&str> {
    let point = floor_char_boundary(text, point);
    let (start, end) = scan_window(text, point);
    let window = &text[start..end];
    let relative = point - start;
    trace!(start, end, relative, "scanning window for URL");

    URL_PATTERN
        .find_iter(window)
        .find(|m| m.start() <= relative && m.end() >= relative)
        .map(|m| m.as_str())
}

/// Byte range of the line around `point`, clamped to [`SCAN_RADIUS`] chars
/// either side.
fn scan_window(text: &str, point: usize) -> (usize, usize) {
    let line_start = text[..point].rfind('\n').map_or(0, |i| i + 1);
    let line_end = text[point..].find('\n').map_or(text.len(), |i| point + i);

    let start = text[line_start..point]
        .char_indices()
        .rev()
        .take(SCAN_RADIUS)
        .last()
        .map_or(point, |(i, _)| line_start + i);
    let end = text[point..line_end]
        .char_indices()
        .nth(SCAN_RADIUS)
        .map_or(line_end, |(i, _)| point + i);

    (start, end)
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}
