//! Brave web search.

use search_tool_core::{Error, SearchConfig, SearchEngine};
use url::Url;

use super::{Engine, check_engine, url_with_params};
use crate::parsers::{BraveParser, ResultParser};

const BASE_URL: &str = "https://search.brave.com/search";

/// Web results Brave serves per page.
const RESULTS_PER_PAGE: usize = 20;

/// Brave Search, one tab per twenty results.
#[derive(Debug, Clone)]
pub struct BraveEngine {
    config: SearchConfig,
    parser: BraveParser,
}

impl BraveEngine {
    /// # Errors
    ///
    /// Returns `Error::Configuration` if `config` names another engine.
    pub fn new(config: SearchConfig) -> Result<Self, Error> {
        check_engine(&config, SearchEngine::Brave)?;
        let parser = BraveParser::new(&config);
        Ok(Self { config, parser })
    }
}

#[async_trait::async_trait]
impl Engine for BraveEngine {
    fn kind(&self) -> SearchEngine {
        SearchEngine::Brave
    }

    fn pages_needed(&self) -> usize {
        (self.config.num_results.max(1) - 1) / RESULTS_PER_PAGE + 1
    }

    /// Brave's `offset` counts pages, not results.
    fn build_search_url(&self, query: &str, page_no: usize) -> Result<Url, Error> {
        let mut params = vec![("q", query.to_string())];
        if page_no > 0 {
            params.push(("offset", page_no.to_string()));
        }
        params.push(("source", "web".to_string()));

        url_with_params(BASE_URL, &params)
    }

    fn parser(&self) -> &dyn ResultParser {
        &self.parser
    }
}
