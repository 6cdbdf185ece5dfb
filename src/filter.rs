use url::Url;

/// Keeps a crawl on the origin of its seed URL.
///
/// Two URLs share an origin here when their scheme and host are equal. Port,
/// path and query play no part in the comparison, so "https://site.test/" and
/// "https://site.test:8443/admin" count as the same site while
/// "http://site.test/" does not.
#[derive(Debug, Clone)]
pub struct OriginFilter {
    scheme: String,
    host: String,
}

impl OriginFilter {
    /// Create a filter anchored to the crawl's seed URL
    pub fn from_seed(seed: &Url) -> Self {
        Self {
            scheme: seed.scheme().to_string(),
            host: seed.host_str().unwrap_or_default().to_string(),
        }
    }

    /// Whether `url` shares the seed's scheme and host
    pub fn is_same_origin(&self, url: &Url) -> bool {
        url.scheme() == self.scheme && url.host_str() == Some(self.host.as_str())
    }

    /// Resolve an href against the page it appeared on, dropping any fragment.
    ///
    /// Returns `None` for hrefs that do not form a valid URL against the
    /// base; those anchors are skipped silently.
    pub fn resolve(base: &Url, href: &str) -> Option<Url> {
        let mut resolved = base.join(href).ok()?;
        resolved.set_fragment(None);
        Some(resolved)
    }

    /// Resolve a page's raw anchor hrefs and keep the same-origin ones
    pub fn same_origin_links(&self, page_url: &Url, hrefs: &[String]) -> Vec<Url> {
        hrefs
            .iter()
            .filter_map(|href| Self::resolve(page_url, href))
            .filter(|resolved| self.is_same_origin(resolved))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter_for(seed: &str) -> OriginFilter {
        OriginFilter::from_seed(&Url::parse(seed).unwrap())
    }

    #[test]
    fn test_same_host_and_scheme_is_same_origin() {
        let filter = filter_for("https://site.example.com/start");

        let same = Url::parse("https://site.example.com/deep/page?q=1").unwrap();
        assert!(filter.is_same_origin(&same));
    }

    #[test]
    fn test_other_host_is_rejected() {
        let filter = filter_for("https://site.example.com/");

        let other = Url::parse("https://other.example.com/page").unwrap();
        assert!(!filter.is_same_origin(&other));
    }

    #[test]
    fn test_scheme_must_match() {
        let filter = filter_for("https://site.example.com/");

        let http = Url::parse("http://site.example.com/page").unwrap();
        assert!(!filter.is_same_origin(&http));
    }

    #[test]
    fn test_port_does_not_split_the_origin() {
        let filter = filter_for("https://site.example.com/");

        let odd_port = Url::parse("https://site.example.com:8443/page").unwrap();
        assert!(filter.is_same_origin(&odd_port));
    }

    #[test]
    fn test_relative_hrefs_resolve_against_the_page() {
        let page = Url::parse("https://site.example.com/docs/intro").unwrap();

        let resolved = OriginFilter::resolve(&page, "../about").unwrap();
        assert_eq!(resolved.as_str(), "https://site.example.com/about");

        let rooted = OriginFilter::resolve(&page, "/contact").unwrap();
        assert_eq!(rooted.as_str(), "https://site.example.com/contact");
    }

    #[test]
    fn test_fragments_are_stripped_on_resolve() {
        let page = Url::parse("https://site.example.com/docs").unwrap();

        let resolved = OriginFilter::resolve(&page, "/docs#section-2").unwrap();
        assert_eq!(resolved.as_str(), "https://site.example.com/docs");

        // A fragment-only href is the page itself
        let self_link = OriginFilter::resolve(&page, "#top").unwrap();
        assert_eq!(self_link.as_str(), "https://site.example.com/docs");
    }

    #[test]
    fn test_protocol_relative_hrefs_inherit_the_scheme() {
        let filter = filter_for("https://site.example.com/");
        let page = Url::parse("https://site.example.com/").unwrap();

        let same_host = OriginFilter::resolve(&page, "//site.example.com/a").unwrap();
        assert_eq!(same_host.scheme(), "https");
        assert!(filter.is_same_origin(&same_host));

        let cdn = OriginFilter::resolve(&page, "//cdn.example.com/lib.js").unwrap();
        assert!(!filter.is_same_origin(&cdn));
    }

    #[test]
    fn test_same_origin_links_skips_foreign_and_broken_hrefs() {
        let filter = filter_for("https://site.example.com/");
        let page = Url::parse("https://site.example.com/index").unwrap();

        let hrefs = vec![
            "/about".to_string(),
            "https://elsewhere.example.org/".to_string(),
            "mailto:someone@example.com".to_string(),
            "http://[broken".to_string(),
            "page2#notes".to_string(),
        ];

        let links = filter.same_origin_links(&page, &hrefs);
        let as_strings: Vec<&str> = links.iter().map(|u| u.as_str()).collect();

        assert_eq!(
            as_strings,
            vec![
                "https://site.example.com/about",
                "https://site.example.com/page2",
            ]
        );
    }
}
