pub mod detect;
pub mod ocr;


pub use detect::TextRegionDetector;
pub use ocr::OcrReader;

use url::Url;

/// Download an image resource as raw bytes.
///
/// Shares the fail-soft contract of the page fetcher: any transport error
/// becomes `None`, which readers treat as "no text in this image". Decoding
/// is left to each analyzer.
pub(crate) async fn download(client: &reqwest::Client, url: &Url) -> Option<Vec<u8>> {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            ::log::debug!("image fetch failed for {}: {}", url, e);
            return None;
        }
    };

    match response.bytes().await {
        Ok(bytes) => Some(bytes.to_vec()),
        Err(e) => {
            ::log::debug!("could not read image bytes from {}: {}", url, e);
            None
        }
    }
}
