use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Which match signals a scan evaluates on each page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMode {
    /// Match the phrase against page text only
    #[default]
    TextOnly,

    /// Scan images only (OCR plus visual detection); page text is ignored
    ImagesOnly,

    /// Match page text and scan images
    TextAndImages,
}

impl SearchMode {
    /// Whether page text is matched in this mode
    pub fn includes_text(&self) -> bool {
        matches!(self, Self::TextOnly | Self::TextAndImages)
    }

    /// Whether images are scanned in this mode
    pub fn includes_images(&self) -> bool {
        matches!(self, Self::ImagesOnly | Self::TextAndImages)
    }
}

/// Configuration for a site scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// URL the crawl starts from; only links sharing its scheme and host
    /// are followed
    pub seed_url: String,

    /// Phrase to search for, matched as a literal lower-cased substring
    pub phrase: String,

    /// Which signals to evaluate per page
    #[serde(default)]
    pub mode: SearchMode,

    /// Maximum number of pages one run may take off the frontier
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Per-request timeout in seconds, for pages and images alike
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Language passed to the OCR engine
    #[serde(default = "default_ocr_lang")]
    pub ocr_lang: String,

    /// Thresholds for the visual text detector
    #[serde(default)]
    pub detector: DetectorConfig,
}

/// Thresholds for the visual text detector.
///
/// The defaults are empirical. They were tuned against screenshots and web
/// graphics with rendered text and may need adjusting for other material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Radius of the neighbourhood used by the adaptive threshold;
    /// must be at least 1
    #[serde(default = "default_block_radius")]
    pub block_radius: u32,

    /// Smallest region width that still counts as text-like
    #[serde(default = "default_min_region_width")]
    pub min_region_width: u32,

    /// Largest region width that still counts as text-like
    #[serde(default = "default_max_region_width")]
    pub max_region_width: u32,

    /// Smallest region height that still counts as text-like
    #[serde(default = "default_min_region_height")]
    pub min_region_height: u32,

    /// Largest region height that still counts as text-like
    #[serde(default = "default_max_region_height")]
    pub max_region_height: u32,

    /// How many qualifying regions an image needs before it is flagged
    #[serde(default = "default_min_regions")]
    pub min_regions: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            block_radius: default_block_radius(),
            min_region_width: default_min_region_width(),
            max_region_width: default_max_region_width(),
            min_region_height: default_min_region_height(),
            max_region_height: default_max_region_height(),
            min_regions: default_min_regions(),
        }
    }
}

/// Default page budget
fn default_max_pages() -> usize {
    150
}

/// Default request timeout in seconds
fn default_timeout_secs() -> u64 {
    10
}

/// Default user agent string
fn default_user_agent() -> String {
    concat!("site-sweep/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Default OCR language
fn default_ocr_lang() -> String {
    "eng".to_string()
}

/// Default adaptive threshold radius
fn default_block_radius() -> u32 {
    5
}

/// Default minimum text region width in pixels
fn default_min_region_width() -> u32 {
    20
}

/// Default maximum text region width in pixels
fn default_max_region_width() -> u32 {
    500
}

/// Default minimum text region height in pixels
fn default_min_region_height() -> u32 {
    10
}

/// Default maximum text region height in pixels
fn default_max_region_height() -> u32 {
    200
}

/// Default number of regions required to flag an image
fn default_min_regions() -> usize {
    3
}

impl ScanConfig {
    /// Create a new configuration with default values
    pub fn new(seed_url: &str, phrase: &str) -> Self {
        Self {
            seed_url: seed_url.to_string(),
            phrase: phrase.to_string(),
            mode: SearchMode::default(),
            max_pages: default_max_pages(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            ocr_lang: default_ocr_lang(),
            detector: DetectorConfig::default(),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }
}
