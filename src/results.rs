use serde::{Deserialize, Serialize};
use std::fmt;

/// Match record for a single page.
///
/// Only pages where at least one signal fired produce a record; pages the
/// crawl visited without finding anything leave no trace in the outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    /// URL of the matching page
    pub url: String,

    /// Occurrences of the phrase in the page text
    pub text_count: usize,

    /// Occurrences of the phrase recognized inside the page's images,
    /// summed over every image on the page
    pub ocr_count: usize,

    /// Whether any image on the page looked like it contains text
    pub visual_text_detected: bool,
}

impl PageResult {
    /// True when the phrase occurred in the page text
    pub fn found_in_text(&self) -> bool {
        self.text_count > 0
    }

    /// True when OCR read the phrase out of at least one image
    pub fn found_in_images(&self) -> bool {
        self.ocr_count > 0
    }

    /// Combined text and OCR occurrence count
    pub fn total_count(&self) -> usize {
        self.text_count + self.ocr_count
    }

    /// True when any signal fired for this page
    pub fn any_signal(&self) -> bool {
        self.text_count > 0 || self.ocr_count > 0 || self.visual_text_detected
    }
}

/// How a crawl reached its end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// The frontier ran dry before the page budget was spent
    Completed,

    /// The page budget was spent with unvisited URLs still queued
    BudgetExhausted,

    /// The caller's cancellation token fired mid-crawl
    Cancelled,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::BudgetExhausted => write!(f, "page budget exhausted"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Everything a finished crawl reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlOutcome {
    /// Match records, in the order the pages were scanned
    pub results: Vec<PageResult>,

    /// Pages actually taken off the frontier and processed
    pub pages_scanned: usize,

    /// Why the crawl stopped
    pub termination: Termination,
}

impl CrawlOutcome {
    /// Number of pages with at least one match signal
    pub fn pages_matched(&self) -> usize {
        self.results.len()
    }

    /// Total phrase occurrences across all page text
    pub fn total_text_occurrences(&self) -> usize {
        self.results.iter().map(|r| r.text_count).sum()
    }

    /// Total phrase occurrences recognized inside images
    pub fn total_ocr_occurrences(&self) -> usize {
        self.results.iter().map(|r| r.ocr_count).sum()
    }
}

/// Progress event emitted once per claimed page, in scan order
#[derive(Debug, Clone)]
pub struct Progress {
    /// Pages claimed so far, the current one included
    pub scanned: usize,

    /// Page budget for this run
    pub budget: usize,

    /// URL being scanned
    pub url: String,
}

impl Progress {
    /// Completed fraction of the budget, between 0.0 and 1.0
    pub fn fraction(&self) -> f64 {
        if self.budget == 0 {
            return 1.0;
        }
        (self.scanned as f64 / self.budget as f64).min(1.0)
    }
}
