//! Temp filename derivation from URLs and MIME types.
//!
//! A downloaded file keeps a name as close as possible to the one in the
//! URL so that editors pick the right syntax mode. Names without an extension
//! borrow one from the response's `Content-Type`.

use std::path::{Component, Path};

use tracing::debug;
use url::Url;

use super::constants::{DEFAULT_CONTENT_TYPE, INDEX_FILENAME, MAX_STEM_CHARS};

/// MIME type to extension table. The first entry for a MIME type is its
/// preferred extension; the first entry for an extension is its MIME type.
const MIME_EXTENSIONS: &[(&str, &str)] = &[
    ("text/html", ".html"),
    ("text/html", ".htm"),
    ("text/plain", ".txt"),
    ("text/css", ".css"),
    ("text/csv", ".csv"),
    ("text/markdown", ".md"),
    ("text/x-markdown", ".md"),
    ("text/xml", ".xml"),
    ("application/xml", ".xml"),
    ("application/json", ".json"),
    ("application/ld+json", ".jsonld"),
    ("application/javascript", ".js"),
    ("text/javascript", ".js"),
    ("application/x-yaml", ".yaml"),
    ("application/yaml", ".yaml"),
    ("text/yaml", ".yaml"),
    ("application/toml", ".toml"),
    ("application/rss+xml", ".rss"),
    ("application/atom+xml", ".atom"),
    ("application/xhtml+xml", ".xhtml"),
    ("application/x-sh", ".sh"),
    ("text/x-python", ".py"),
    ("text/x-c", ".c"),
    ("text/x-rust", ".rs"),
    ("application/pdf", ".pdf"),
    ("application/zip", ".zip"),
    ("application/gzip", ".gz"),
    ("application/x-tar", ".tar"),
    ("application/octet-stream", ".bin"),
    ("image/jpeg", ".jpg"),
    ("image/png", ".png"),
    ("image/gif", ".gif"),
    ("image/svg+xml", ".svg"),
    ("image/webp", ".webp"),
    ("video/mp4", ".mp4"),
    ("audio/mpeg", ".mp3"),
];

/// Name parts for a temp file: the stem used as a prefix and the extension
/// used as a suffix around the random part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempName {
    /// Filename stem taken from the URL.
    pub stem: String,
    /// Extension including its leading dot, if one was found.
    pub extension: Option<String>,
}

impl TempName {
    /// Prefix for the temp file (`<stem>_`).
    #[must_use]
    pub fn prefix(&self) -> String {
        format!("{}_", self.stem)
    }

    /// Suffix for the temp file (the extension, or nothing).
    #[must_use]
    pub fn suffix(&self) -> &str {
        self.extension.as_deref().unwrap_or("")
    }
}

/// Derives temp filename parts from a URL.
///
/// The last path segment is used (percent-decoded and made filesystem safe).
/// A URL with no filename portion is assumed to be `index.html`. When the
/// name has no extension of its own, `mime_ext` is used instead.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use url_downloader::download::temp_name;
///
/// let url = Url::parse("https://example.com/notes/README").unwrap();
/// let name = temp_name(&url, Some(".txt"));
/// assert_eq!(name.stem, "README");
/// assert_eq!(name.extension.as_deref(), Some(".txt"));
/// ```
#[must_use]
pub fn temp_name(url: &Url, mime_ext: Option<&str>) -> TempName {
    let name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|last| !last.is_empty())
        .map_or_else(
            || INDEX_FILENAME.to_string(),
            |last| {
                let decoded = urlencoding::decode(last).unwrap_or_else(|e| {
                    debug!(segment = %last, error = %e, "URL decoding failed, using raw segment");
                    last.into()
                });
                sanitize_filename(&decoded)
            },
        );

    let (stem, ext) = split_extension(&name);
    let stem: String = stem.chars().take(MAX_STEM_CHARS).collect();
    let extension = if ext.is_empty() {
        mime_ext.map(ToString::to_string)
    } else {
        Some(ext.to_string())
    };

    TempName { stem, extension }
}

/// Guesses a file extension from a `Content-Type` header value.
///
/// Parameters such as `charset` are ignored and matching is case-insensitive.
/// Unknown types yield `None`.
#[must_use]
pub fn extension_for_mime(content_type: &str) -> Option<&'static str> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    let mime = if mime.is_empty() {
        DEFAULT_CONTENT_TYPE
    } else {
        mime.as_str()
    };

    MIME_EXTENSIONS
        .iter()
        .find(|(candidate, _)| *candidate == mime)
        .map(|(_, ext)| *ext)
}

/// Guesses a MIME type from a local path's extension, defaulting to
/// `text/plain` the way a plain file read would be labelled.
#[must_use]
pub fn mime_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .and_then(|ext| {
            MIME_EXTENSIONS
                .iter()
                .find(|(_, candidate)| *candidate == ext)
                .map(|(mime, _)| *mime)
        })
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

/// Splits a filename into stem and extension.
///
/// Leading dots never start an extension, so `.bashrc` has none, and the
/// extension keeps its dot (`archive.tar.gz` → `archive.tar` + `.gz`).
pub(crate) fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(dot) if name[..dot].chars().any(|c| c != '.') => (&name[..dot], &name[dot..]),
        _ => (name, ""),
    }
}

/// Sanitizes filename for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > |
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn name_for(url: &str, mime_ext: Option<&str>) -> TempName {
        temp_name(&Url::parse(url).unwrap(), mime_ext)
    }

    #[test]
    fn test_temp_name_uses_url_filename() {
        let name = name_for("https://example.com/src/main.rs", Some(".txt"));
        assert_eq!(name.stem, "main");
        assert_eq!(name.extension.as_deref(), Some(".rs"));
    }

    #[test]
    fn test_temp_name_root_path_is_index_html() {
        let name = name_for("https://example.com", Some(".json"));
        assert_eq!(name.stem, "index");
        assert_eq!(name.extension.as_deref(), Some(".html"));

        let name = name_for("https://example.com/", None);
        assert_eq!(name.prefix(), "index_");
        assert_eq!(name.suffix(), ".html");
    }

    #[test]
    fn test_temp_name_directory_path_is_index_html() {
        let name = name_for("https://example.com/docs/", Some(".txt"));
        assert_eq!(name.stem, "index");
        assert_eq!(name.suffix(), ".html");
    }

    #[test]
    fn test_temp_name_borrows_mime_extension() {
        let name = name_for("https://example.com/api/users", Some(".json"));
        assert_eq!(name.stem, "users");
        assert_eq!(name.extension.as_deref(), Some(".json"));
    }

    #[test]
    fn test_temp_name_without_any_extension() {
        let name = name_for("https://example.com/LICENSE", None);
        assert_eq!(name.stem, "LICENSE");
        assert_eq!(name.extension, None);
        assert_eq!(name.suffix(), "");
    }

    #[test]
    fn test_temp_name_ignores_query_and_fragment() {
        let name = name_for("https://example.com/a/page.php?id=3#top", None);
        assert_eq!(name.stem, "page");
        assert_eq!(name.suffix(), ".php");
    }

    #[test]
    fn test_temp_name_decodes_and_sanitizes() {
        let name = name_for("https://example.com/my%20notes.md", None);
        assert_eq!(name.stem, "my notes");

        let name = name_for("https://example.com/a%2Fb.txt", None);
        assert_eq!(name.stem, "a_b");
    }

    #[test]
    fn test_temp_name_truncates_long_stems() {
        let url = format!("https://example.com/{}.txt", "s".repeat(300));
        let name = name_for(&url, None);
        assert_eq!(name.stem.chars().count(), MAX_STEM_CHARS);
        assert_eq!(name.suffix(), ".txt");
    }

    #[test]
    fn test_temp_name_file_url() {
        let name = name_for("file:///tmp/data/report.csv", None);
        assert_eq!(name.stem, "report");
        assert_eq!(name.suffix(), ".csv");
    }

    #[test]
    fn test_split_extension_follows_splitext() {
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_extension(".bashrc"), (".bashrc", ""));
        assert_eq!(split_extension("..hidden"), ("..hidden", ""));
        assert_eq!(split_extension("trailing."), ("trailing", "."));
        assert_eq!(split_extension("plain"), ("plain", ""));
    }

    #[test]
    fn test_extension_for_mime_known_types() {
        assert_eq!(extension_for_mime("text/html"), Some(".html"));
        assert_eq!(extension_for_mime("application/json"), Some(".json"));
        assert_eq!(extension_for_mime("image/png"), Some(".png"));
    }

    #[test]
    fn test_extension_for_mime_ignores_params_and_case() {
        assert_eq!(extension_for_mime("Text/HTML; charset=UTF-8"), Some(".html"));
        assert_eq!(extension_for_mime("text/plain;charset=utf-8"), Some(".txt"));
    }

    #[test]
    fn test_extension_for_mime_empty_is_plain_text() {
        assert_eq!(extension_for_mime(""), Some(".txt"));
    }

    #[test]
    fn test_extension_for_mime_unknown_is_none() {
        assert_eq!(extension_for_mime("application/x-made-up"), None);
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("/srv/page.HTML")), "text/html");
        assert_eq!(mime_for_path(Path::new("/srv/data.json")), "application/json");
        assert_eq!(mime_for_path(Path::new("/srv/Makefile")), "text/plain");
    }

    #[test]
    fn test_sanitize_filename_removes_invalid_chars() {
        assert_eq!(sanitize_filename("file:name.txt"), "file_name.txt");
        assert_eq!(sanitize_filename("file<name>.txt"), "file_name_.txt");
        assert_eq!(sanitize_filename("a|b?.txt"), "a_b_.txt");
    }

    #[test]
    fn test_sanitize_filename_rewrites_dot_segments() {
        assert_eq!(sanitize_filename("."), "_");
        assert_eq!(sanitize_filename(".."), "__");
    }

    #[test]
    fn test_sanitize_filename_preserves_valid_chars() {
        assert_eq!(sanitize_filename("file (1).txt"), "file (1).txt");
        assert_eq!(sanitize_filename("日本語.txt"), "日本語.txt");
    }
}
