use clap::{Parser, ValueEnum};
use site_sweep::SearchMode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "site-sweep")]
#[command(about = "Scans a site for a phrase in page text and images")]
#[command(version)]
pub struct Args {
    /// URL to start scanning from
    #[arg(required_unless_present = "config_file")]
    pub url: Option<String>,

    /// Phrase to search for
    #[arg(short, long, required_unless_present = "config_file")]
    pub phrase: Option<String>,

    /// Which signals to evaluate per page
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Maximum number of pages to scan
    #[arg(short = 'n', long)]
    pub max_pages: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// JSON config file with scan settings (flags take precedence)
    #[arg(short, long)]
    pub config_file: Option<PathBuf>,

    /// Suppress the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Match page text only
    Text,
    /// Scan images only (OCR plus visual detection)
    Images,
    /// Match page text and scan images
    TextAndImages,
}

/// Convert from the CLI mode flag to the library's search mode
pub fn convert_mode(mode: ModeArg) -> SearchMode {
    match mode {
        ModeArg::Text => SearchMode::TextOnly,
        ModeArg::Images => SearchMode::ImagesOnly,
        ModeArg::TextAndImages => SearchMode::TextAndImages,
    }
}
