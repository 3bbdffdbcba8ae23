//! Text input for the `at` command: a file, or stdin.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use url_downloader::parser::{Selection, TextPosition};

use crate::cli::AtArgs;

/// Reads the text to search: `file`, or stdin when it is missing or `-`.
pub(crate) fn read_text(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display())),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read text from stdin")?;
            Ok(buffer)
        }
    }
}

/// Caret, selection and click point resolved against `text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolvedPositions {
    pub(crate) selection: Selection,
    pub(crate) point: Option<usize>,
}

pub(crate) fn resolve_positions(args: &AtArgs, text: &str) -> Result<ResolvedPositions> {
    let head = resolve_one("--cursor", args.cursor, text)?;
    let anchor = match args.anchor {
        Some(anchor) => resolve_one("--anchor", anchor, text)?,
        None => head,
    };
    let point = args
        .point
        .map(|point| resolve_one("--point", point, text))
        .transpose()?;
    Ok(ResolvedPositions {
        selection: Selection::new(anchor, head),
        point,
    })
}

fn resolve_one(flag: &str, position: TextPosition, text: &str) -> Result<usize> {
    position
        .resolve(text)
        .with_context(|| format!("Invalid {flag} position {position}"))
}
