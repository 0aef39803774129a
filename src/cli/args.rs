//! Command line argument parsing for the simple-search CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// simple-search - full-text search over folders of HTML pages
#[derive(Parser, Debug, Clone)]
#[command(name = "simple-search")]
#[command(about = "Full-text search over folders of HTML pages")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SimpleSearchArgs {
    /// Verbosity level (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SimpleSearchArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n + 1,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build an index from a configuration file and run one query
    Search(SearchArgs),

    /// Build an index in the background and answer queries from stdin
    Shell(ShellArgs),

    /// Show the title and text extracted from an HTML file
    Extract(ExtractArgs),
}

/// Arguments for a one-shot search
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Configuration file (JSON)
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Query words
    #[arg(value_name = "QUERY", required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Override the maximum number of hits
    #[arg(short, long)]
    pub limit: Option<usize>,
}

impl SearchArgs {
    /// The query words joined back into one string.
    pub fn query_text(&self) -> String {
        self.query.join(" ")
    }
}

/// Arguments for the interactive shell
#[derive(Parser, Debug, Clone)]
pub struct ShellArgs {
    /// Configuration file (JSON)
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}

/// Arguments for extraction
#[derive(Parser, Debug, Clone)]
pub struct ExtractArgs {
    /// HTML file to extract
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// CSS selector locating the title element
    #[arg(short, long, default_value = "")]
    pub selector: String,

    /// Characters kept when the title is generated
    #[arg(long, default_value_t = crate::config::DEFAULT_TITLE_LENGTH)]
    pub title_length: usize,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
