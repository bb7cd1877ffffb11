//! DuckDuckGo SERP parser.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use search_tool_core::{SearchConfig, SearchEngine, WebResult};
use url::Url;

use super::{Candidate, ResultCollector, ResultParser, text_of};

const CONTAINER: &str = ".react-results--main";

/// Base for DuckDuckGo's relative result links.
const BASE_URL: &str = "https://duckduckgo.com/";

static CONTAINER_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse(CONTAINER).expect("invalid selector"));
static ARTICLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".react-results--main article[data-testid='result']").expect("invalid selector")
});
static ORGANIC: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".react-results--main [data-layout='organic']").expect("invalid selector"));
static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2 a[href]").expect("invalid selector"));
static DISPLAY_HOST: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("span[data-testid='result-extras-url-host'], span.result__url__domain").expect("invalid selector")
});
static SNIPPET: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div[data-testid='result-snippet'], .result__snippet").expect("invalid selector")
});

/// Parses DuckDuckGo result pages.
#[derive(Debug, Clone)]
pub struct DuckDuckGoParser {
    num_results: usize,
}

impl DuckDuckGoParser {
    pub fn new(config: &SearchConfig) -> Self {
        Self { num_results: config.num_results }
    }
}

impl ResultParser for DuckDuckGoParser {
    fn container_selector(&self) -> &'static str {
        CONTAINER
    }

    fn parse(&self, html: &str) -> Vec<WebResult> {
        let document = Html::parse_document(html);

        if document.select(&CONTAINER_SEL).next().is_none() {
            tracing::warn!("main search results container '{CONTAINER}' not found");
            return Vec::new();
        }

        let mut blocks: Vec<_> = document.select(&ARTICLE).collect();
        if blocks.is_empty() {
            blocks = document.select(&ORGANIC).collect();
        }

        let mut collector = ResultCollector::new(SearchEngine::DuckDuckGo, self.num_results);
        if let Ok(base) = Url::parse(BASE_URL) {
            collector = collector.with_base(base);
        }

        for block in blocks {
            if collector.is_full() {
                break;
            }

            let link = block.select(&TITLE_LINK).next();
            let title = link.and_then(text_of);
            let href = link.and_then(|a| a.value().attr("href")).map(str::to_string);
            let display_url = link.and_then(|a| a.select(&DISPLAY_HOST).next()).and_then(text_of);
            let snippet = block.select(&SNIPPET).next().and_then(text_of);

            collector.push(Candidate { title, href, snippet, display_url });
        }

        collector.finish()
    }
}
