//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use url_downloader::config::FileConfig;
use url_downloader::parser::TextPosition;

/// Download the URL under the cursor and open it in your editor.
///
/// The file lives in a temp file that is deleted when the editor exits,
/// unless it was saved.
#[derive(Parser, Debug)]
#[command(name = "url-downloader")]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file to use instead of the default location (must exist)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Editor command line, e.g. "code --wait"
    #[arg(long, value_name = "COMMAND", global = true)]
    pub editor: Option<String>,

    /// Directory for temp files
    #[arg(long, value_name = "DIR", global = true)]
    pub temp_dir: Option<PathBuf>,

    /// Print [URL: ...] before opening the file
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        global = true
    )]
    pub show_url: Option<bool>,

    /// Treat a non-empty selection as the URL
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        global = true
    )]
    pub open_selection: Option<bool>,

    /// Protocol prepended to URLs without http/file prefix
    #[arg(long, value_name = "PROTOCOL", global = true)]
    pub default_protocol: Option<String>,
}

impl GlobalArgs {
    /// Command-line values as the top settings layer.
    #[must_use]
    pub fn overrides(&self) -> FileConfig {
        FileConfig {
            open_selection: self.open_selection,
            default_protocol: self.default_protocol.clone(),
            show_url: self.show_url,
            editor: self.editor.clone(),
            temp_dir: self.temp_dir.clone(),
            ..FileConfig::default()
        }
    }

    /// Log level used when `RUST_LOG` is not set.
    ///
    /// Priority: quiet flag > verbose flag > default (info)
    #[must_use]
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download URL and open it; the file is deleted when the editor exits
    Open {
        /// URL to open (a missing protocol gets --default-protocol)
        url: String,
    },

    /// Find the URL at a position in a text and open it
    At(AtArgs),

    /// Download URL into a temp file and print its path
    Fetch {
        /// URL to download
        url: String,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `at`.
#[derive(Args, Debug, Clone)]
pub struct AtArgs {
    /// Text file to search (stdin when omitted or "-")
    pub file: Option<PathBuf>,

    /// Caret position: LINE:COLUMN (1-based) or a byte offset
    #[arg(long, value_name = "POS")]
    pub cursor: TextPosition,

    /// Other end of the selection; defaults to the caret
    #[arg(long, value_name = "POS")]
    pub anchor: Option<TextPosition>,

    /// Position that was clicked, overriding the caret
    #[arg(long, value_name = "POS")]
    pub point: Option<TextPosition>,

    /// Print the menu caption instead of opening the URL
    #[arg(long)]
    pub describe: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Print effective settings and config path
    Show,
}
