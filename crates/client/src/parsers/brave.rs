//! Brave Search SERP parser.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use search_tool_core::{SearchConfig, SearchEngine, WebResult};

use super::{Candidate, ResultCollector, ResultParser, text_of};

const CONTAINER: &str = "#results";

static CONTAINER_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse(CONTAINER).expect("invalid selector"));
static BLOCK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#results .snippet[data-type='web']").expect("invalid selector"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".title").expect("invalid selector"));
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").expect("invalid selector"));
static SNIPPET: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".snippet-content, p.snippet-description, div.desc").expect("invalid selector")
});

/// Parses Brave Search result pages.
#[derive(Debug, Clone)]
pub struct BraveParser {
    num_results: usize,
}

impl BraveParser {
    pub fn new(config: &SearchConfig) -> Self {
        Self { num_results: config.num_results }
    }
}

impl ResultParser for BraveParser {
    fn container_selector(&self) -> &'static str {
        CONTAINER
    }

    fn parse(&self, html: &str) -> Vec<WebResult> {
        let document = Html::parse_document(html);

        if document.select(&CONTAINER_SEL).next().is_none() {
            tracing::warn!("main search results container '{CONTAINER}' not found");
            return Vec::new();
        }

        let mut collector = ResultCollector::new(SearchEngine::Brave, self.num_results);
        for block in document.select(&BLOCK) {
            if collector.is_full() {
                break;
            }

            let title = block.select(&TITLE).next().and_then(text_of);
            let href = block
                .select(&LINK)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(str::to_string);
            let snippet = block.select(&SNIPPET).next().and_then(text_of);

            collector.push(Candidate { title, href, snippet, display_url: None });
        }

        collector.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_HTML: &str = r#"
        <html><body>
        <div id="results">
          <div class="snippet" data-type="web">
            <a href="https://www.rust-lang.org/"><div class="title">Rust Programming Language</div></a>
            <div class="snippet-content">A language empowering everyone.</div>
          </div>
          <div class="snippet" data-type="news">
            <a href="https://news.example.com/"><div class="title">News item</div></a>
          </div>
          <div class="snippet" data-type="web">
            <a href="https://crates.io/"><div class="title">crates.io</div></a>
            <p class="snippet-description">The Rust community's crate registry.</p>
          </div>
          <div class="snippet" data-type="web">
            <a href="ftp://files.example.com/"><div class="title">FTP mirror</div></a>
          </div>
        </div>
        </body></html>
    "#;

    fn parser(num_results: usize) -> BraveParser {
        BraveParser::new(&SearchConfig { num_results, ..Default::default() })
    }

    #[test]
    fn test_parse_web_results_only() {
        let results = parser(20).parse(FIXTURE_HTML);
        assert_eq!(results.len(), 2);

        assert_eq!(results[0].title, "Rust Programming Language");
        assert_eq!(results[0].snippet.as_deref(), Some("A language empowering everyone."));
        assert_eq!(results[0].search_engine, "brave");

        assert_eq!(results[1].title, "crates.io");
        assert_eq!(results[1].url.as_str(), "https://crates.io/");
        assert_eq!(results[1].snippet.as_deref(), Some("The Rust community's crate registry."));
        assert_eq!(results[1].position, Some(2));
    }

    #[test]
    fn test_missing_container_returns_empty() {
        let html = r#"<div class="snippet" data-type="web"><a href="https://x.example/"><div class="title">X</div></a></div>"#;
        assert!(parser(20).parse(html).is_empty());
    }

    #[test]
    fn test_parse_respects_num_results() {
        assert_eq!(parser(1).parse(FIXTURE_HTML).len(), 1);
    }
}
