//! Google web search.

use search_tool_core::{Error, SafeSearch, SearchConfig, SearchEngine, TimeRange};
use url::Url;

use super::{Engine, check_engine, url_with_params};
use crate::parsers::{GoogleParser, ResultParser};

const BASE_URL: &str = "https://www.google.com/search";

/// Organic results Google serves per page.
const RESULTS_PER_PAGE: usize = 10;

/// Google, one tab per ten results.
#[derive(Debug, Clone)]
pub struct GoogleEngine {
    config: SearchConfig,
    parser: GoogleParser,
}

impl GoogleEngine {
    /// # Errors
    ///
    /// Returns `Error::Configuration` if `config` names another engine.
    pub fn new(config: SearchConfig) -> Result<Self, Error> {
        check_engine(&config, SearchEngine::Google)?;
        let parser = GoogleParser::new(&config);
        Ok(Self { config, parser })
    }
}

#[async_trait::async_trait]
impl Engine for GoogleEngine {
    fn kind(&self) -> SearchEngine {
        SearchEngine::Google
    }

    fn pages_needed(&self) -> usize {
        (self.config.num_results.max(1) - 1) / RESULTS_PER_PAGE + 1
    }

    fn build_search_url(&self, query: &str, page_no: usize) -> Result<Url, Error> {
        let config = &self.config;
        let mut params = vec![("q", query.to_string())];

        if page_no > 0 {
            params.push(("start", (page_no * RESULTS_PER_PAGE).to_string()));
        }
        if let Some(language) = config.language.as_deref() {
            params.push(("hl", language.to_string()));
        }
        if let Some(code) = config.language_code() {
            params.push(("lr", format!("lang_{code}")));
        }
        if let Some(region) = config.region.as_deref() {
            params.push(("gl", region.to_uppercase()));
        }
        params.push(("num", config.num_results.to_string()));

        let safe = match config.safe_search {
            SafeSearch::On => "active",
            SafeSearch::Moderate => "images",
            SafeSearch::Off => "off",
        };
        params.push(("safe", safe.to_string()));

        let qdr = match config.time_range {
            TimeRange::Any => None,
            TimeRange::PastDay => Some("qdr:d"),
            TimeRange::PastWeek => Some("qdr:w"),
            TimeRange::PastMonth => Some("qdr:m"),
            TimeRange::PastYear => Some("qdr:y"),
        };
        if let Some(qdr) = qdr {
            params.push(("tbs", qdr.to_string()));
        }

        url_with_params(BASE_URL, &params)
    }

    fn parser(&self) -> &dyn ResultParser {
        &self.parser
    }
}
