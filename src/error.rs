use thiserror::Error;

/// Errors reported before a scan starts.
///
/// Nothing that happens mid-crawl lands here: unreachable pages, undecodable
/// images and OCR trouble are absorbed where they occur and the scan moves
/// on to the next page.
#[derive(Debug, Error)]
pub enum ScanError {
    /// No seed URL was provided
    #[error("no seed URL provided")]
    MissingSeedUrl,

    /// No search phrase was provided
    #[error("no search phrase provided")]
    MissingPhrase,

    /// The seed URL could not be parsed
    #[error("invalid seed URL: {0}")]
    InvalidSeedUrl(#[from] url::ParseError),

    /// The page budget must be a positive integer
    #[error("page budget must be at least 1")]
    ZeroPageBudget,

    /// The adaptive threshold needs a positive neighbourhood radius
    #[error("detector block radius must be at least 1")]
    ZeroBlockRadius,

    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
