use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};

use crate::models::JobOffer;

/// One job board. The crawl loop and the persistence layer are written
/// against this trait; each board supplies only its own markup rules.
pub trait Site {
    fn name(&self) -> &'static str;

    /// The site's own index for its first results page (0 or 1, site-dependent).
    fn first_page(&self) -> u32;

    /// URL for the given page index. `page_url(first_page())` must be the
    /// configured base URL.
    fn page_url(&self, page: u32) -> String;

    /// Index of the last results page, read off the first page's pagination
    /// widget. When the widget is missing or unreadable, assume a single page.
    fn last_page(&self, doc: &Html) -> u32;

    /// One raw record per listing container found on the page. An empty Vec
    /// is not an error; it is the crawl loop's end-of-results signal.
    fn extract(&self, doc: &Html) -> Vec<JobOffer>;
}

/// Compile a CSS selector, turning the parse error into something `?` can carry.
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid selector '{}': {}", css, e))
}

/// Collapse an element's text nodes into one trimmed, single-spaced string.
pub fn text_of(el: ElementRef) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strip a literal label from a detail line and return the trimmed remainder.
pub fn strip_label(line: &str, label: &str) -> Option<String> {
    let rest = line.replacen(label, "", 1);
    let rest = rest.trim();
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}
