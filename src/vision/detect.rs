use crate::config::DetectorConfig;
use crate::vision;
use image::GrayImage;
use imageproc::contours::{self, BorderType};
use imageproc::contrast;
use imageproc::point::Point;
use url::Url;

/// Flags images that look like they contain text, without reading any.
///
/// The signal is purely geometric: binarize with an adaptive threshold,
/// trace the outer contours, and count the ones whose bounding box has
/// word-like proportions. It catches text that OCR misses on stylized
/// fonts, low resolution or poor contrast, and reports only presence.
#[derive(Debug, Clone)]
pub struct TextRegionDetector {
    client: reqwest::Client,
    config: DetectorConfig,
}

impl TextRegionDetector {
    /// Create a detector with the given thresholds
    pub fn new(client: reqwest::Client, config: DetectorConfig) -> Self {
        Self { client, config }
    }

    /// Download an image and report whether it shows enough text-shaped
    /// regions. Any failure along the way reads as "no text detected".
    pub async fn detect(&self, image_url: &Url) -> bool {
        let Some(bytes) = vision::download(&self.client, image_url).await else {
            return false;
        };

        let Ok(decoded) = image::load_from_memory(&bytes) else {
            ::log::debug!("undecodable image at {}", image_url);
            return false;
        };

        let regions = count_text_regions(&decoded.to_luma8(), &self.config);
        ::log::debug!("{} text-shaped regions in {}", regions, image_url);

        regions >= self.config.min_regions
    }
}

/// Count regions whose bounding box fits the configured envelope.
///
/// The adaptive threshold keeps pixels at or above their local mean, which
/// maps dark-on-light glyphs to background. Inverting afterwards makes the
/// darker-than-neighbourhood side the foreground, so text turns into
/// discrete blobs whose outer contours can be measured. Without that flip
/// the only outer contour would be the page background itself.
pub fn count_text_regions(grey: &GrayImage, config: &DetectorConfig) -> usize {
    let mut binary = contrast::adaptive_threshold(grey, config.block_radius);
    image::imageops::invert(&mut binary);

    contours::find_contours::<i32>(&binary)
        .into_iter()
        .filter(|contour| contour.border_type == BorderType::Outer)
        .filter(|contour| {
            let Some((width, height)) = bounding_box(&contour.points) else {
                return false;
            };
            width >= config.min_region_width
                && width <= config.max_region_width
                && height >= config.min_region_height
                && height <= config.max_region_height
        })
        .count()
}

/// Width and height of the axis-aligned box around a contour
fn bounding_box(points: &[Point<i32>]) -> Option<(u32, u32)> {
    let first = points.first()?;
    let (mut min_x, mut max_x) = (first.x, first.x);
    let (mut min_y, mut max_y) = (first.y, first.y);

    for point in points {
        min_x = min_x.min(point.x);
        max_x = max_x.max(point.x);
        min_y = min_y.min(point.y);
        max_y = max_y.max(point.y);
    }

    Some(((max_x - min_x + 1) as u32, (max_y - min_y + 1) as u32))
}
