//! Search engine implementations.
//!
//! An engine knows how to build its result page URLs, how many pages a
//! search needs, how to drive a page until the results are present, and
//! which parser reads them.

mod brave;
mod duckduckgo;
mod google;

pub use brave::BraveEngine;
pub use duckduckgo::DuckDuckGoEngine;
pub use google::GoogleEngine;

use std::sync::LazyLock;
use std::time::Duration;

use futures_util::future::try_join_all;
use regex::Regex;
use search_tool_core::{Error, SearchConfig, SearchEngine, WebResult};
use url::Url;

use crate::browser::SerpPage;
use crate::parsers::ResultParser;

/// How long to wait for a results container or button to appear.
pub const READY_TIMEOUT: Duration = Duration::from_secs(10);

static BLOCK_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)captcha|unusual traffic|are you a robot|access denied").expect("invalid regex")
});

/// Reason a loaded page looks like a CAPTCHA or block page, if it does.
///
/// Result page titles echo the query, so a suspicious title only counts when
/// the results container never appeared.
pub fn detect_block(title: Option<&str>, url: Option<&str>, results_shown: bool) -> Option<String> {
    if let Some(url) = url
        && url.contains("/sorry/")
    {
        return Some("redirected to interstitial".to_string());
    }
    if !results_shown
        && let Some(title) = title
        && BLOCK_TITLE.is_match(title)
    {
        return Some(format!("page title '{title}'"));
    }
    None
}

/// A search engine driven through a browser page.
#[async_trait::async_trait]
pub trait Engine: Send + Sync {
    fn kind(&self) -> SearchEngine;

    /// Number of result pages needed to satisfy `num_results`.
    fn pages_needed(&self) -> usize {
        1
    }

    /// URL of result page `page_no` (0-based) for `query`.
    fn build_search_url(&self, query: &str, page_no: usize) -> Result<Url, Error>;

    fn parser(&self) -> &dyn ResultParser;

    /// Load result page `page_no` into `page` and parse it.
    async fn page_results(&self, page: &dyn SerpPage, page_no: usize, query: &str) -> Result<Vec<WebResult>, Error> {
        let url = self.build_search_url(query, page_no)?;
        page.goto(&url).await?;
        let ready = self.wait_until_ready(page).await?;
        self.read_results(page, &url, ready).await
    }

    /// Wait for the parser's results container and report whether it appeared.
    ///
    /// A container that never shows up is logged; the parser decides what
    /// an incomplete page yields.
    async fn wait_until_ready(&self, page: &dyn SerpPage) -> Result<bool, Error> {
        let selector = self.parser().container_selector();
        let ready = page.wait_for(selector, READY_TIMEOUT).await?;
        if !ready {
            tracing::warn!(engine = %self.kind(), selector, "results container did not appear");
        }
        Ok(ready)
    }

    /// Check for a block page, then parse the page content.
    async fn read_results(&self, page: &dyn SerpPage, url: &Url, ready: bool) -> Result<Vec<WebResult>, Error> {
        let title = page.title().await?;
        let current = page.current_url().await?;
        if let Some(reason) = detect_block(title.as_deref(), current.as_deref(), ready) {
            return Err(Error::Blocked(format!(
                "potential CAPTCHA or block page from {} at {url}: {reason}",
                self.kind()
            )));
        }

        let html = page.content().await?;
        if html.trim().is_empty() {
            return Err(Error::Parsing(format!("empty document from {} at {url}", self.kind())));
        }
        Ok(self.parser().parse(&html))
    }
}

/// Ensure an engine is constructed for the engine its config names.
pub(crate) fn check_engine(config: &SearchConfig, expected: SearchEngine) -> Result<(), Error> {
    if config.search_engine != expected {
        return Err(Error::Configuration(format!(
            "{expected} engine initialized with incorrect search engine: {}",
            config.search_engine
        )));
    }
    Ok(())
}

/// Build a URL from a base and form-encoded query parameters.
pub(crate) fn url_with_params(base: &str, params: &[(&str, String)]) -> Result<Url, Error> {
    Ok(Url::parse_with_params(base, params)?)
}

/// Instantiate the engine named by `config.search_engine`.
pub fn engine_for(config: &SearchConfig) -> Result<Box<dyn Engine>, Error> {
    Ok(match config.search_engine {
        SearchEngine::Google => Box::new(GoogleEngine::new(config.clone())?),
        SearchEngine::DuckDuckGo => Box::new(DuckDuckGoEngine::new(config.clone())?),
        SearchEngine::Brave => Box::new(BraveEngine::new(config.clone())?),
    })
}

/// Fetch every page concurrently and merge the results.
///
/// Page `i` of `pages` loads result page `i`. Any page failure fails the
/// whole search. Results keep page order, are truncated to `limit`, and are
/// renumbered from 1.
pub async fn collect_results<P: SerpPage>(
    engine: &dyn Engine, pages: &[P], query: &str, limit: usize,
) -> Result<Vec<WebResult>, Error> {
    let per_page = try_join_all(
        pages
            .iter()
            .enumerate()
            .map(|(page_no, page)| engine.page_results(page, page_no, query)),
    )
    .await?;

    let mut results: Vec<WebResult> = per_page.into_iter().flatten().collect();
    results.truncate(limit);
    for (idx, result) in results.iter_mut().enumerate() {
        result.position = Some(idx + 1);
    }
    Ok(results)
}


#[cfg(test)]
mod tests {
    use super::testing::FakePage;
    use super::*;

    fn brave_page(titles: &[&str]) -> String {
        let blocks: String = titles
            .iter()
            .map(|t| {
                format!(
                    r#"<div class="snippet" data-type="web"><a href="https://{t}.example/"><div class="title">{t}</div></a></div>"#
                )
            })
            .collect();
        format!(r#"<div id="results">{blocks}</div>"#)
    }

    #[test]
    fn test_detect_block() {
        assert!(detect_block(Some("Google Search"), Some("https://www.google.com/search?q=x"), true).is_none());
        assert!(detect_block(Some("reCAPTCHA challenge"), None, false).is_some());
        assert!(detect_block(Some("Unusual traffic from your network"), None, false).is_some());
        assert!(detect_block(None, Some("https://www.google.com/sorry/index?continue=x"), true).is_some());
        assert!(detect_block(None, None, false).is_none());
    }

    #[test]
    fn test_detect_block_ignores_query_in_result_title() {
        assert!(detect_block(Some("captcha solver - Google Search"), None, true).is_none());
        assert!(detect_block(Some("access denied error at DuckDuckGo"), None, true).is_none());
    }

    #[test]
    fn test_engine_for_registry() {
        for engine in SearchEngine::ALL {
            let built = engine_for(&SearchConfig::for_engine(engine)).unwrap();
            assert_eq!(built.kind(), engine);
        }
    }

    #[tokio::test]
    async fn test_collect_results_merges_in_page_order() {
        let config = SearchConfig { search_engine: SearchEngine::Brave, num_results: 3, ..Default::default() };
        let engine = BraveEngine::new(config).unwrap();

        let first = FakePage::serving("https://search.brave.com/search", &brave_page(&["a", "b"]));
        let second = FakePage::serving("https://search.brave.com/search", &brave_page(&["c", "d"]));

        let results = collect_results(&engine, &[first, second], "rust", 3).await.unwrap();
        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["a", "b", "c"]);
        let positions: Vec<Option<usize>> = results.iter().map(|r| r.position).collect();
        assert_eq!(positions, [Some(1), Some(2), Some(3)]);
    }

    #[tokio::test]
    async fn test_collect_results_visits_each_page_url() {
        let config = SearchConfig { search_engine: SearchEngine::Brave, num_results: 40, ..Default::default() };
        let engine = BraveEngine::new(config).unwrap();
        let pages = [FakePage::default(), FakePage::default()];

        collect_results(&engine, &pages, "rust", 40).await.unwrap();

        assert_eq!(pages[0].visited(), ["https://search.brave.com/search?q=rust&source=web"]);
        assert_eq!(pages[1].visited(), ["https://search.brave.com/search?q=rust&offset=1&source=web"]);
    }

    #[tokio::test]
    async fn test_collect_results_fails_when_any_page_fails() {
        let engine = BraveEngine::new(SearchConfig::for_engine(SearchEngine::Brave)).unwrap();
        let ok = FakePage::serving("https://search.brave.com", &brave_page(&["a"]));
        let broken = FakePage { fail_navigation: true, ..Default::default() };

        let result = collect_results(&engine, &[ok, broken], "rust", 10).await;
        assert!(matches!(result, Err(Error::Browser(_))));
    }

    #[tokio::test]
    async fn test_block_page_is_reported() {
        let engine = GoogleEngine::new(SearchConfig::default()).unwrap();
        let page = FakePage {
            title: Some("Before you continue - CAPTCHA".into()),
            missing: vec!["#search".into()],
            ..Default::default()
        };

        let result = engine.page_results(&page, 0, "rust").await;
        assert!(matches!(result, Err(Error::Blocked(msg)) if msg.contains("google")));
    }

    #[tokio::test]
    async fn test_query_in_result_title_is_not_a_block() {
        let engine = BraveEngine::new(SearchConfig::for_engine(SearchEngine::Brave)).unwrap();
        let page = FakePage {
            title: Some("recaptcha alternatives - Brave Search".into()),
            ..FakePage::serving("https://search.brave.com/search", &brave_page(&["recaptcha"]))
        };

        let results = engine.page_results(&page, 0, "recaptcha alternatives").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "recaptcha");
    }

    #[tokio::test]
    async fn test_google_interstitial_is_reported_even_with_results() {
        let engine = GoogleEngine::new(SearchConfig::default()).unwrap();
        let page = FakePage::serving("https://www.google.com/search", "<div id=\"search\"></div>");
        *page.current.lock().unwrap() = Some("https://www.google.com/sorry/index".into());

        let url = engine.build_search_url("rust", 0).unwrap();
        let result = engine.read_results(&page, &url, true).await;
        assert!(matches!(result, Err(Error::Blocked(msg)) if msg.contains("interstitial")));
    }

    #[tokio::test]
    async fn test_empty_document_is_a_parsing_error() {
        let engine = BraveEngine::new(SearchConfig::for_engine(SearchEngine::Brave)).unwrap();
        let page = FakePage::serving("https://search.brave.com/search", "  ");

        let result = engine.page_results(&page, 0, "rust").await;
        assert!(matches!(result, Err(Error::Parsing(msg)) if msg.contains("brave")));
    }

    #[tokio::test]
    async fn test_missing_container_still_parses() {
        let engine = BraveEngine::new(SearchConfig::for_engine(SearchEngine::Brave)).unwrap();
        let page = FakePage { missing: vec!["#results".into()], ..Default::default() };

        let results = engine.page_results(&page, 0, "rust").await.unwrap();
        assert!(results.is_empty());
    }
}
