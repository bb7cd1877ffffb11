//! DuckDuckGo web search.
//!
//! DuckDuckGo serves one result page and loads further results in place
//! when the "More results" button is pressed, so a search uses a single tab
//! and clicks until enough results are on the page.

use search_tool_core::{Error, SafeSearch, SearchConfig, SearchEngine, TimeRange, WebResult};
use url::Url;

use super::{Engine, READY_TIMEOUT, check_engine, url_with_params};
use crate::browser::SerpPage;
use crate::parsers::{DuckDuckGoParser, ResultParser};

const BASE_URL: &str = "https://duckduckgo.com/";
const MORE_RESULTS: &str = "button#more-results";

/// Results added by each "More results" click.
const RESULTS_PER_LOAD: usize = 10;

#[derive(Debug, Clone)]
pub struct DuckDuckGoEngine {
    config: SearchConfig,
    parser: DuckDuckGoParser,
}

impl DuckDuckGoEngine {
    /// # Errors
    ///
    /// Returns `Error::Configuration` if `config` names another engine.
    pub fn new(config: SearchConfig) -> Result<Self, Error> {
        check_engine(&config, SearchEngine::DuckDuckGo)?;
        let parser = DuckDuckGoParser::new(&config);
        Ok(Self { config, parser })
    }

    /// Number of "More results" clicks needed for `num_results`.
    fn extra_loads(&self) -> usize {
        (self.config.num_results.max(1) - 1) / RESULTS_PER_LOAD
    }

    async fn load_more(&self, page: &dyn SerpPage) -> Result<(), Error> {
        let loads = self.extra_loads();
        for attempt in 1..=loads {
            if !page.wait_for(MORE_RESULTS, READY_TIMEOUT).await? {
                tracing::warn!(attempt, loads, "'More results' button not found; parsing results loaded so far");
                break;
            }
            page.click(MORE_RESULTS).await?;
            page.scroll_to_bottom().await?;
            page.settle().await;
            tracing::debug!(attempt, loads, "loaded more results");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Engine for DuckDuckGoEngine {
    fn kind(&self) -> SearchEngine {
        SearchEngine::DuckDuckGo
    }

    fn build_search_url(&self, query: &str, _page_no: usize) -> Result<Url, Error> {
        let config = &self.config;
        let mut params = vec![("q", query.to_string())];

        let kl = match (config.region.as_deref(), config.language_code()) {
            (Some(region), Some(lang)) => Some(format!("{region}-{lang}").to_lowercase()),
            (Some(region), None) => Some(region.to_lowercase()),
            _ => None,
        };
        if let Some(kl) = kl {
            params.push(("kl", kl));
        }

        let kp = match config.safe_search {
            SafeSearch::On => "-1",
            SafeSearch::Moderate => "-2",
            SafeSearch::Off => "1",
        };
        params.push(("kp", kp.to_string()));

        let df = match config.time_range {
            TimeRange::Any => None,
            TimeRange::PastDay => Some("d"),
            TimeRange::PastWeek => Some("w"),
            TimeRange::PastMonth => Some("m"),
            TimeRange::PastYear => Some("y"),
        };
        if let Some(df) = df {
            params.push(("df", df.to_string()));
        }
        params.push(("ia", "web".to_string()));

        url_with_params(BASE_URL, &params)
    }

    fn parser(&self) -> &dyn ResultParser {
        &self.parser
    }

    async fn page_results(&self, page: &dyn SerpPage, page_no: usize, query: &str) -> Result<Vec<WebResult>, Error> {
        let url = self.build_search_url(query, page_no)?;
        page.goto(&url).await?;
        let ready = self.wait_until_ready(page).await?;
        self.load_more(page).await?;
        self.read_results(page, &url, ready).await
    }
}
