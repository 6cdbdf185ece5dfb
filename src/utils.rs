/// Strips trailing slashes from a seed URL so "https://site.test/" and
/// "https://site.test" start the same crawl
pub fn strip_trailing_slashes(url: &str) -> &str {
    url.trim_end_matches('/')
}

/// Shortens a URL to at most `max_chars` characters for one-line status output
pub fn elide(url: &str, max_chars: usize) -> String {
    if url.chars().count() <= max_chars {
        return url.to_string();
    }
    let head: String = url.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{head}...")
}
