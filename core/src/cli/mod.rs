pub mod report;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::types::DEFAULT_FUZZY_THRESHOLD;

/// Command-line arguments for labcat
#[derive(Parser, Debug)]
#[command(name = "labcat")]
#[command(about = "Extract normalized results from OCR'd lab reports")]
#[command(version)]
pub struct Cli {
    /// Path to the markdown report (`-` reads stdin)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Directory holding phrase.json, common_phrases.txt and valid_short_terms.txt
    #[arg(long, value_name = "DIR")]
    pub vocabulary: Option<PathBuf>,

    /// Fuzzy-match threshold; a label must score strictly above it
    #[arg(short, long, default_value_t = DEFAULT_FUZZY_THRESHOLD)]
    pub threshold: u8,

    /// Detect the header separator instead of always skipping two lines
    #[arg(long)]
    pub detect_header: bool,

    /// Run every stage on the calling thread
    #[arg(long)]
    pub sequential: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Print per-stage counters
    #[arg(long)]
    pub stats: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Returns whether the report should be read from stdin
    pub fn reads_stdin(&self) -> bool {
        self.file.as_os_str() == "-"
    }
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}
