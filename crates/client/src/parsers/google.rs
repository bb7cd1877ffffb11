//! Google SERP parser.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use search_tool_core::{SearchConfig, SearchEngine, WebResult};

use super::{Candidate, ResultCollector, ResultParser, text_of};

const CONTAINER: &str = "#search";

static CONTAINER_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse(CONTAINER).expect("invalid selector"));
static BLOCK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#search [data-hveid]").expect("invalid selector"));
static BLOCK_FALLBACK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.g").expect("invalid selector"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h3").expect("invalid selector"));
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").expect("invalid selector"));
static CITE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("cite").expect("invalid selector"));
static SNIPPET: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div[data-sncf='1'], div.VwiC3b span, div.MUxGbd span").expect("invalid selector")
});

/// Parses Google result pages.
#[derive(Debug, Clone)]
pub struct GoogleParser {
    num_results: usize,
}

impl GoogleParser {
    pub fn new(config: &SearchConfig) -> Self {
        Self { num_results: config.num_results }
    }
}

impl ResultParser for GoogleParser {
    fn container_selector(&self) -> &'static str {
        CONTAINER
    }

    fn parse(&self, html: &str) -> Vec<WebResult> {
        let document = Html::parse_document(html);

        // Layouts without #search still sometimes carry div.g blocks.
        if document.select(&CONTAINER_SEL).next().is_none() {
            tracing::warn!("main search results container '{CONTAINER}' not found; parsing may be incomplete");
        }

        let mut blocks: Vec<_> = document.select(&BLOCK).collect();
        if blocks.is_empty() {
            blocks = document.select(&BLOCK_FALLBACK).collect();
        }

        let mut collector = ResultCollector::new(SearchEngine::Google, self.num_results);
        for block in blocks {
            if collector.is_full() {
                break;
            }

            let title = block.select(&TITLE).next().and_then(text_of);

            let link = block
                .select(&LINK)
                .find(|a| a.value().attr("href").is_some_and(|href| href.starts_with("http")));
            let href = link.and_then(|a| a.value().attr("href")).map(str::to_string);
            let display_url = link.and_then(|a| a.select(&CITE).next()).and_then(text_of);

            let parts: Vec<String> = block.select(&SNIPPET).filter_map(text_of).collect();
            let snippet = if parts.is_empty() { None } else { Some(parts.join(" ")) };

            collector.push(Candidate { title, href, snippet, display_url });
        }

        collector.finish()
    }
}
