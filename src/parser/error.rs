//! Error types for cursor position handling.

use thiserror::Error;

/// Errors that can occur when resolving a position against a text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    /// The position string is neither `LINE:COLUMN` nor a byte offset.
    #[error("invalid position '{input}': {reason}\n  Suggestion: use LINE:COLUMN (1-based) or a byte offset")]
    Invalid {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The requested line does not exist in the text.
    #[error("line {line} is past the end of the text ({lines} lines)")]
    LineOutOfRange {
        /// Requested 1-based line.
        line: usize,
        /// Number of lines in the text.
        lines: usize,
    },

    /// The byte offset lies past the end of the text.
    #[error("offset {offset} is past the end of the text ({len} bytes)")]
    OffsetOutOfRange {
        /// Requested byte offset.
        offset: usize,
        /// Text length in bytes.
        len: usize,
    },
}

impl PositionError {
    /// Creates an `Invalid` error for unparseable input.
    #[must_use]
    pub fn invalid(input: &str, reason: &'static str) -> Self {
        Self::Invalid {
            input: input.to_string(),
            reason,
        }
    }
}
