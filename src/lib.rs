// Re-export modules
pub mod config;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod matcher;
pub mod page;
pub mod results;
pub mod utils;
pub mod vision;

mod scanner;

// Re-export commonly used types for convenience
pub use config::{DetectorConfig, ScanConfig, SearchMode};
pub use error::ScanError;
pub use results::{CrawlOutcome, PageResult, Progress, Termination};
pub use tokio_util::sync::CancellationToken;

use scanner::ProgressFn;

/// Builder for a site scan.
///
/// A scan crawls same-origin pages breadth-first from a seed URL and
/// reports, per page, how often a phrase occurs in the page text, how often
/// OCR finds it inside images, and whether any image looks like it contains
/// text at all.
///
/// ```no_run
/// use site_sweep::{Scan, SearchMode};
///
/// # async fn run() -> Result<(), site_sweep::ScanError> {
/// let outcome = Scan::new("https://example.com", "lorem ipsum")
///     .with_mode(SearchMode::TextAndImages)
///     .with_max_pages(50)
///     .run()
///     .await?;
///
/// for page in &outcome.results {
///     println!("{}: {} occurrence(s)", page.url, page.total_count());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Scan {
    config: ScanConfig,
    progress: Option<ProgressFn>,
    cancel: CancellationToken,
}

impl Scan {
    /// Create a scan of `seed_url` for `phrase` with default settings
    pub fn new(seed_url: &str, phrase: &str) -> Self {
        Self::with_config(ScanConfig::new(seed_url, phrase))
    }

    /// Create a scan from a full configuration
    pub fn with_config(config: ScanConfig) -> Self {
        Self {
            config,
            progress: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Load the configuration from a JSON file
    pub fn with_config_file(
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::with_config(ScanConfig::from_file(path)?))
    }

    /// Set which signals the scan evaluates
    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Cap how many pages one run may take off the frontier
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    /// Set the per-request timeout in seconds
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.config.timeout_secs = timeout_secs;
        self
    }

    /// Register a callback invoked once per claimed page, in scan order.
    ///
    /// The callback fires before the page is fetched, so a budget-`n` run
    /// produces at most `n` events with `scanned` counting up from 1.
    pub fn on_progress(mut self, callback: impl FnMut(&Progress) + Send + 'static) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    /// A token that stops this scan when cancelled.
    ///
    /// The crawl notices the token between pages and returns the partial
    /// outcome with the `Cancelled` termination.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the crawl to completion
    pub async fn run(self) -> Result<CrawlOutcome, ScanError> {
        scanner::scan(self.config, self.progress, self.cancel).await
    }
}
