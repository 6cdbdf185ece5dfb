use crate::vision;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};
use rusty_tesseract::Args;
use url::Url;

/// Upscale factor applied before recognition
const UPSCALE: u32 = 2;

/// Classic 3x3 sharpening kernel
const SHARPEN_KERNEL: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];

/// Contrast adjustment applied after sharpening
const CONTRAST_BOOST: f32 = 40.0;

/// Tesseract page segmentation mode 6 treats the image as one uniform
/// block of text
const SINGLE_BLOCK_PSM: i32 = 6;

/// Reads text out of images with Tesseract.
///
/// Recognition is strictly advisory. A failed download, an undecodable image
/// or a missing tesseract binary all yield an empty string, never an error,
/// so a broken image cannot take down a crawl.
#[derive(Debug, Clone)]
pub struct OcrReader {
    client: reqwest::Client,
    lang: String,
}

impl OcrReader {
    /// Create a reader that recognizes text in the given language
    pub fn new(client: reqwest::Client, lang: &str) -> Self {
        Self {
            client,
            lang: lang.to_string(),
        }
    }

    /// Download an image and return the lower-cased text recognized in it
    pub async fn extract_text(&self, image_url: &Url) -> String {
        let Some(bytes) = vision::download(&self.client, image_url).await else {
            return String::new();
        };

        let Ok(decoded) = image::load_from_memory(&bytes) else {
            ::log::debug!("undecodable image at {}", image_url);
            return String::new();
        };

        let prepared = preprocess(&decoded);
        let lang = self.lang.clone();

        // Tesseract runs as a child process; keep it off the async runtime.
        let recognized = tokio::task::spawn_blocking(move || recognize(prepared, &lang)).await;

        match recognized {
            Ok(Some(text)) => text.to_lowercase(),
            Ok(None) => String::new(),
            Err(e) => {
                ::log::debug!("OCR task for {} did not finish: {}", image_url, e);
                String::new()
            }
        }
    }
}

/// Prepare an image for recognition: greyscale, 2x linear upscale, sharpen,
/// then boost contrast. Tuned for small web images with rendered text.
pub fn preprocess(image: &DynamicImage) -> GrayImage {
    let grey = image.to_luma8();
    let (width, height) = grey.dimensions();

    let upscaled = imageops::resize(
        &grey,
        width * UPSCALE,
        height * UPSCALE,
        FilterType::Triangle,
    );
    let mut sharpened = imageops::filter3x3(&upscaled, &SHARPEN_KERNEL);
    restore_border(&upscaled, &mut sharpened);

    imageops::contrast(&sharpened, CONTRAST_BOOST)
}

/// Copy the outer pixel ring from `source` into `filtered`; `filter3x3`
/// computes interior pixels only and leaves the ring at zero
fn restore_border(source: &GrayImage, filtered: &mut GrayImage) {
    let (width, height) = filtered.dimensions();
    for x in 0..width {
        filtered.put_pixel(x, 0, *source.get_pixel(x, 0));
        filtered.put_pixel(x, height - 1, *source.get_pixel(x, height - 1));
    }
    for y in 0..height {
        filtered.put_pixel(0, y, *source.get_pixel(0, y));
        filtered.put_pixel(width - 1, y, *source.get_pixel(width - 1, y));
    }
}

fn recognize(prepared: GrayImage, lang: &str) -> Option<String> {
    let dynamic = DynamicImage::ImageLuma8(prepared);
    let input = match rusty_tesseract::Image::from_dynamic_image(&dynamic) {
        Ok(input) => input,
        Err(e) => {
            ::log::debug!("could not stage image for OCR: {}", e);
            return None;
        }
    };

    let args = Args {
        lang: lang.to_string(),
        psm: Some(SINGLE_BLOCK_PSM),
        ..Args::default()
    };

    match rusty_tesseract::image_to_string(&input, &args) {
        Ok(text) => Some(text),
        Err(e) => {
            ::log::debug!("tesseract failed: {}", e);
            None
        }
    }
}
