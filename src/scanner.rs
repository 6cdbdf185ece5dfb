use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::fetcher::PageFetcher;
use crate::filter::OriginFilter;
use crate::matcher;
use crate::results::{CrawlOutcome, PageResult, Progress, Termination};
use crate::utils;
use crate::vision::{OcrReader, TextRegionDetector};
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Callback invoked once per claimed page, in scan order
pub(crate) type ProgressFn = Box<dyn FnMut(&Progress) + Send>;

/// FIFO queue of discovered URLs plus the set of URLs already claimed.
///
/// Discovery only checks the visited set, so a URL found on two pages before
/// either copy is crawled sits in the queue twice. `claim_next` resolves the
/// duplicates by discarding entries visited in the meantime, which keeps
/// every URL claimed at most once.
#[derive(Debug, Default)]
struct Frontier {
    queue: VecDeque<Url>,
    visited: HashSet<Url>,
}

impl Frontier {
    fn seeded(seed: &Url) -> Self {
        let mut frontier = Self::default();
        frontier.queue.push_back(seed.clone());
        frontier
    }

    /// Queue a discovered link unless it has already been claimed
    fn enqueue(&mut self, url: &Url) {
        if !self.visited.contains(url) {
            self.queue.push_back(url.clone());
        }
    }

    /// Pop the next never-claimed URL and mark it visited
    fn claim_next(&mut self) -> Option<Url> {
        while let Some(url) = self.queue.pop_front() {
            if self.visited.insert(url.clone()) {
                return Some(url);
            }
        }
        None
    }

    /// Whether any queued URL is still waiting for its first visit
    fn has_pending(&self) -> bool {
        self.queue.iter().any(|url| !self.visited.contains(url))
    }
}

/// Drives one crawl: claims URLs off the frontier, fans each page out to the
/// matchers, and collects the per-page results.
struct Scanner {
    seed: Url,
    phrase: String,
    config: ScanConfig,
    fetcher: PageFetcher,
    filter: OriginFilter,
    ocr: OcrReader,
    detector: TextRegionDetector,
}

/// Validate the configuration and run the crawl to completion
pub(crate) async fn scan(
    config: ScanConfig,
    mut progress: Option<ProgressFn>,
    cancel: CancellationToken,
) -> Result<CrawlOutcome, ScanError> {
    let seed = parse_seed(&config.seed_url)?;
    if config.phrase.trim().is_empty() {
        return Err(ScanError::MissingPhrase);
    }
    if config.max_pages == 0 {
        return Err(ScanError::ZeroPageBudget);
    }
    if config.detector.block_radius == 0 {
        return Err(ScanError::ZeroBlockRadius);
    }

    let phrase = config.phrase.to_lowercase();
    let fetcher = PageFetcher::new(Duration::from_secs(config.timeout_secs), &config.user_agent)?;
    let client = fetcher.client();

    let scanner = Scanner {
        filter: OriginFilter::from_seed(&seed),
        ocr: OcrReader::new(client.clone(), &config.ocr_lang),
        detector: TextRegionDetector::new(client, config.detector.clone()),
        seed,
        phrase,
        config,
        fetcher,
    };

    Ok(scanner.run(&mut progress, &cancel).await)
}

fn parse_seed(seed_url: &str) -> Result<Url, ScanError> {
    let trimmed = utils::strip_trailing_slashes(seed_url.trim());
    if trimmed.is_empty() {
        return Err(ScanError::MissingSeedUrl);
    }
    Ok(Url::parse(trimmed)?)
}

impl Scanner {
    async fn run(
        &self,
        progress: &mut Option<ProgressFn>,
        cancel: &CancellationToken,
    ) -> CrawlOutcome {
        let budget = self.config.max_pages;
        let mut frontier = Frontier::seeded(&self.seed);
        let mut results = Vec::new();
        let mut scanned = 0usize;
        let mut cancelled = false;

        ::log::info!(
            "scanning {} for {:?}, budget {} pages, mode {:?}",
            self.seed,
            self.phrase,
            budget,
            self.config.mode
        );

        while scanned < budget {
            if cancel.is_cancelled() {
                ::log::info!("scan cancelled after {} pages", scanned);
                cancelled = true;
                break;
            }

            let Some(page_url) = frontier.claim_next() else {
                break;
            };

            scanned += 1;
            if let Some(callback) = progress.as_mut() {
                callback(&Progress {
                    scanned,
                    budget,
                    url: page_url.as_str().to_string(),
                });
            }

            ::log::debug!("scanning page {}/{}: {}", scanned, budget, page_url);

            let content = self.fetcher.fetch_page(&page_url).await;

            let text_count = match (&content, self.config.mode.includes_text()) {
                (Some(content), true) => matcher::count_occurrences(&content.text, &self.phrase),
                _ => 0,
            };

            let (ocr_count, visual_detected) = match (&content, self.config.mode.includes_images())
            {
                (Some(content), true) => self.scan_images(&page_url, &content.images).await,
                _ => (0, false),
            };

            if text_count > 0 || ocr_count > 0 || visual_detected {
                ::log::info!(
                    "match on {}: text {}, ocr {}, visual {}",
                    page_url,
                    text_count,
                    ocr_count,
                    visual_detected
                );
                results.push(PageResult {
                    url: page_url.as_str().to_string(),
                    text_count,
                    ocr_count,
                    visual_text_detected: visual_detected,
                });
            }

            if let Some(content) = &content {
                for link in self.filter.same_origin_links(&page_url, &content.anchors) {
                    frontier.enqueue(&link);
                }
            }
        }

        let termination = if cancelled {
            Termination::Cancelled
        } else if frontier.has_pending() {
            Termination::BudgetExhausted
        } else {
            Termination::Completed
        };

        ::log::info!(
            "scan finished: {} pages scanned, {} matched, {}",
            scanned,
            results.len(),
            termination
        );

        CrawlOutcome {
            results,
            pages_scanned: scanned,
            termination,
        }
    }

    /// Scan every image on a page.
    ///
    /// OCR counts accumulate across all images, while visual detection stops
    /// looking after its first hit. The two downloads for one image run
    /// concurrently.
    async fn scan_images(&self, page_url: &Url, images: &[String]) -> (usize, bool) {
        let mut ocr_count = 0usize;
        let mut visual_detected = false;

        for src in images {
            let Some(image_url) = OriginFilter::resolve(page_url, src) else {
                continue;
            };

            if visual_detected {
                let recognized = self.ocr.extract_text(&image_url).await;
                ocr_count += matcher::count_occurrences(&recognized, &self.phrase);
            } else {
                let (recognized, detected) = tokio::join!(
                    self.ocr.extract_text(&image_url),
                    self.detector.detect(&image_url),
                );
                ocr_count += matcher::count_occurrences(&recognized, &self.phrase);
                visual_detected = detected;
            }
        }

        (ocr_count, visual_detected)
    }
}
