use crate::page::{self, PageContent};
use std::time::Duration;
use url::Url;

/// Retrieves pages over HTTP and hands their bodies to the page parser.
///
/// Every transport failure collapses to `None`: one unreachable page must
/// not end a crawl. HTTP error statuses are not failures here; an error page
/// has a body worth scanning like any other.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    /// Build a fetcher with a fixed per-request timeout and user agent
    pub fn new(timeout: Duration, user_agent: &str) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }

    /// The underlying client, shared with the image analyzers
    pub fn client(&self) -> reqwest::Client {
        self.client.clone()
    }

    /// Fetch a page and extract its content
    pub async fn fetch_page(&self, url: &Url) -> Option<PageContent> {
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                ::log::debug!("fetch failed for {}: {}", url, e);
                return None;
            }
        };

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                ::log::debug!("could not read body of {}: {}", url, e);
                return None;
            }
        };

        Some(page::parse(&body))
    }
}
