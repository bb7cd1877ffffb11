//! Result page parsers.
//!
//! Each engine's parser turns the rendered SERP HTML into `WebResult`s using
//! CSS selectors. Selectors track the engines' current markup and are kept
//! next to the parser that uses them.
//!
//! ### Shared rules
//! - A result needs a non-empty title and an absolute http(s) URL.
//! - Text is the element's concatenated text content, trimmed.
//! - Positions start at 1 within a page; a URL is emitted once per page.
//! - Parsing stops at the configured `num_results`.

mod brave;
mod duckduckgo;
mod google;

pub use brave::BraveParser;
pub use duckduckgo::DuckDuckGoParser;
pub use google::GoogleParser;

use std::collections::HashSet;

use scraper::ElementRef;
use search_tool_core::{SearchEngine, WebResult};
use url::Url;

/// Turns a result page into web results.
pub trait ResultParser: Send + Sync {
    /// Selector of the element that holds the organic results.
    ///
    /// Engines wait for it before reading the page.
    fn container_selector(&self) -> &'static str;

    /// Extract results from rendered HTML.
    fn parse(&self, html: &str) -> Vec<WebResult>;
}

/// Trimmed text content of an element, `None` when blank.
pub(crate) fn text_of(element: ElementRef<'_>) -> Option<String> {
    let text = element.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() { None } else { Some(text.to_string()) }
}

/// Parse `href` as an absolute http(s) URL, resolving relative links against `base`.
pub(crate) fn http_url(href: &str, base: Option<&Url>) -> Option<Url> {
    let href = href.trim();
    let url = match base {
        Some(base) => base.join(href).ok()?,
        None => Url::parse(href).ok()?,
    };
    matches!(url.scheme(), "http" | "https").then_some(url).filter(|u| u.host_str().is_some())
}

/// Host of a URL, used as the display URL when the page shows none.
pub(crate) fn host_of(url: &Url) -> Option<String> {
    url.host_str().map(str::to_string)
}

/// Fields scraped from one result block before validation.
#[derive(Debug, Default)]
pub(crate) struct Candidate {
    pub title: Option<String>,
    pub href: Option<String>,
    pub snippet: Option<String>,
    pub display_url: Option<String>,
}

/// Validates candidates and assigns positions up to a limit.
pub(crate) struct ResultCollector {
    engine: SearchEngine,
    limit: usize,
    base: Option<Url>,
    seen: HashSet<String>,
    results: Vec<WebResult>,
}

impl ResultCollector {
    pub fn new(engine: SearchEngine, limit: usize) -> Self {
        Self { engine, limit, base: None, seen: HashSet::new(), results: Vec::new() }
    }

    /// Resolve relative hrefs against `base`.
    pub fn with_base(mut self, base: Url) -> Self {
        self.base = Some(base);
        self
    }

    pub fn is_full(&self) -> bool {
        self.results.len() >= self.limit
    }

    pub fn push(&mut self, candidate: Candidate) {
        let (Some(title), Some(href)) = (candidate.title, candidate.href) else {
            return;
        };

        let Some(url) = http_url(&href, self.base.as_ref()) else {
            tracing::warn!(engine = %self.engine, %title, %href, "skipping result with invalid URL");
            return;
        };

        if !self.seen.insert(url.to_string()) {
            return;
        }

        let mut result = WebResult::new(self.engine, title, url);
        result.snippet = candidate.snippet;
        result.display_url = candidate.display_url.or_else(|| host_of(&result.url));
        result.position = Some(self.results.len() + 1);
        self.results.push(result);
    }

    pub fn finish(self) -> Vec<WebResult> {
        tracing::debug!(engine = %self.engine, count = self.results.len(), "parsed result page");
        self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_text_of_trims_and_concatenates() {
        let html = Html::parse_fragment("<p>  Hello <b>Rust</b> world  </p><p>   </p>");
        let selector = Selector::parse("p").unwrap();
        let mut paragraphs = html.select(&selector);
        assert_eq!(text_of(paragraphs.next().unwrap()).as_deref(), Some("Hello Rust world"));
        assert_eq!(text_of(paragraphs.next().unwrap()), None);
    }

    #[test]
    fn test_http_url() {
        assert!(http_url("https://example.com/a", None).is_some());
        assert!(http_url("javascript:void(0)", None).is_none());
        assert!(http_url("/relative", None).is_none());

        let base = Url::parse("https://duckduckgo.com/").unwrap();
        let resolved = http_url("/l/?uddg=x", Some(&base)).unwrap();
        assert_eq!(resolved.as_str(), "https://duckduckgo.com/l/?uddg=x");
    }

    #[test]
    fn test_collector_requires_title_and_url() {
        let mut collector = ResultCollector::new(SearchEngine::Google, 10);
        collector.push(Candidate { title: Some("No link".into()), ..Default::default() });
        collector.push(Candidate { href: Some("https://example.com".into()), ..Default::default() });
        collector.push(Candidate {
            title: Some("Bad link".into()),
            href: Some("not a url".into()),
            ..Default::default()
        });
        assert!(collector.finish().is_empty());
    }

    #[test]
    fn test_collector_positions_dedup_and_limit() {
        let mut collector = ResultCollector::new(SearchEngine::Brave, 2);
        let candidates = [("A", "https://a.example/"), ("A again", "https://a.example/"), ("B", "https://b.example/")];
        for (title, href) in candidates {
            collector.push(Candidate { title: Some(title.into()), href: Some(href.into()), ..Default::default() });
        }
        assert!(collector.is_full());

        let results = collector.finish();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "A");
        assert_eq!(results[0].position, Some(1));
        assert_eq!(results[1].title, "B");
        assert_eq!(results[1].position, Some(2));
        assert_eq!(results[1].display_url.as_deref(), Some("b.example"));
        assert_eq!(results[1].search_engine, "brave");
    }
}
