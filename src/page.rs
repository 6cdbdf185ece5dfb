use scraper::{Html, Selector};

/// Content extracted from one fetched page.
///
/// Extraction happens in a single synchronous pass over the parsed document,
/// so only owned strings ever cross an await point.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    /// Flattened body text, lower-cased, with node boundaries joined by a
    /// single space
    pub text: String,

    /// Raw href values of anchor elements, in document order
    pub anchors: Vec<String>,

    /// Raw src values of image elements, in document order
    pub images: Vec<String>,
}

/// Extract text, anchor targets and image sources from an HTML body.
///
/// Parsing is lenient: any byte soup produces a document, and pages without
/// body text simply yield an empty string.
pub fn parse(html: &str) -> PageContent {
    let document = Html::parse_document(html);

    let body_selector = Selector::parse("body").unwrap();
    let text = document
        .select(&body_selector)
        .flat_map(|node| node.text())
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let anchor_selector = Selector::parse("a[href]").unwrap();
    let anchors = document
        .select(&anchor_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.to_string())
        .collect::<Vec<String>>();

    let image_selector = Selector::parse("img[src]").unwrap();
    let images = document
        .select(&image_selector)
        .filter_map(|element| element.value().attr("src"))
        .map(|src| src.to_string())
        .collect::<Vec<String>>();

    ::log::debug!(
        "extracted {} chars of text, {} anchors, {} images",
        text.len(),
        anchors.len(),
        images.len()
    );

    PageContent {
        text,
        anchors,
        images,
    }
}
