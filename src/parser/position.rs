//! Cursor positions given as `LINE:COLUMN` or byte offsets.

use std::fmt;
use std::str::FromStr;

use super::error::PositionError;

/// A position in a text, as a user or an editor would name it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPosition {
    /// 1-based line and 1-based column counted in characters.
    LineColumn {
        /// 1-based line number.
        line: usize,
        /// 1-based column, in characters.
        column: usize,
    },
    /// Raw byte offset from the start of the text.
    Offset(usize),
}

impl TextPosition {
    /// Resolves the position to a byte offset into `text`.
    ///
    /// Columns past the end of a line clamp to the end of that line (before
    /// its newline). A line one past a trailing newline is the empty last line.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError`] when the line or offset lies outside `text`.
    pub fn resolve(self, text: &str) -> Result<usize, PositionError> {
        match self {
            Self::Offset(offset) if offset > text.len() => Err(PositionError::OffsetOutOfRange {
                offset,
                len: text.len(),
            }),
            Self::Offset(offset) => Ok(offset),
            Self::LineColumn { line, column } => {
                let mut line_start = 0;
                let mut lines = 0;
                for (index, raw_line) in text.split('\n').enumerate() {
                    lines += 1;
                    if index + 1 == line {
                        let content = raw_line.strip_suffix('\r').unwrap_or(raw_line);
                        let within = content
                            .char_indices()
                            .nth(column.saturating_sub(1))
                            .map_or(content.len(), |(i, _)| i);
                        return Ok(line_start + within);
                    }
                    line_start += raw_line.len() + 1;
                }
                Err(PositionError::LineOutOfRange { line, lines })
            }
        }
    }
}

impl FromStr for TextPosition {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some((line, column)) = trimmed.split_once(':') {
            let line = parse_one_based(s, line)?;
            let column = parse_one_based(s, column)?;
            return Ok(Self::LineColumn { line, column });
        }

        trimmed
            .parse::<usize>()
            .map(Self::Offset)
            .map_err(|_| PositionError::invalid(s, "expected a non-negative byte offset"))
    }
}

fn parse_one_based(input: &str, part: &str) -> Result<usize, PositionError> {
    let value = part
        .trim()
        .parse::<usize>()
        .map_err(|_| PositionError::invalid(input, "line and column must be numbers"))?;
    if value == 0 {
        return Err(PositionError::invalid(input, "line and column start at 1"));
    }
    Ok(value)
}

impl fmt::Display for TextPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LineColumn { line, column } => write!(f, "{line}:{column}"),
            Self::Offset(offset) => write!(f, "{offset}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_column() {
        assert_eq!(
            "3:14".parse::<TextPosition>().unwrap(),
            TextPosition::LineColumn { line: 3, column: 14 }
        );
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!("42".parse::<TextPosition>().unwrap(), TextPosition::Offset(42));
    }

    #[test]
    fn test_parse_rejects_zero_line_or_column() {
        assert!("0:1".parse::<TextPosition>().is_err());
        assert!("1:0".parse::<TextPosition>().is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("line five".parse::<TextPosition>().is_err());
        assert!("-3".parse::<TextPosition>().is_err());
        assert!("2:x".parse::<TextPosition>().is_err());
    }

    #[test]
    fn test_resolve_line_column_counts_characters() {
        let text = "héllo\nwörld\n";
        let pos = TextPosition::LineColumn { line: 2, column: 3 };
        // "wö" is 3 bytes, line 2 starts at byte 7.
        assert_eq!(pos.resolve(text).unwrap(), 10);
    }

    #[test]
    fn test_resolve_clamps_column_to_line_end() {
        let text = "ab\r\ncd";
        let pos = TextPosition::LineColumn { line: 1, column: 99 };
        assert_eq!(pos.resolve(text).unwrap(), 2);
    }

    #[test]
    fn test_resolve_line_past_end_is_error() {
        let err = TextPosition::LineColumn { line: 5, column: 1 }
            .resolve("a\nb")
            .unwrap_err();
        assert_eq!(err, PositionError::LineOutOfRange { line: 5, lines: 2 });
    }

    #[test]
    fn test_resolve_offset_bounds() {
        assert_eq!(TextPosition::Offset(3).resolve("abc").unwrap(), 3);
        assert!(TextPosition::Offset(4).resolve("abc").is_err());
    }

    #[test]
    fn test_display_round_trips_input_form() {
        assert_eq!(TextPosition::LineColumn { line: 2, column: 7 }.to_string(), "2:7");
        assert_eq!(TextPosition::Offset(11).to_string(), "11");
    }
}
