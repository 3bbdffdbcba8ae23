//! Error types for editor hosts.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while opening a tab in an editor.
#[derive(Debug, Error)]
pub enum HostError {
    /// No editor command was configured or found in the environment.
    #[error(
        "no editor configured\n  Suggestion: set `editor` in the config file, pass --editor, or export VISUAL/EDITOR"
    )]
    EditorNotConfigured,

    /// The editor process could not be started.
    #[error("failed to start editor '{program}': {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The tab's file could not be read.
    #[error("IO error reading {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl HostError {
    /// Creates a spawn error.
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
