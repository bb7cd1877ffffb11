//! Search orchestration.
//!
//! [`SearchTool`] ties an engine, a page provider and an optional cache
//! together: cached results are served while fresh, otherwise the engine's
//! pages are opened, loaded concurrently and parsed, and the merged results
//! are cached for a lifetime that depends on the time range filter.

use std::path::Path;
use std::time::Instant;

use search_tool_core::{AppConfig, CacheDb, Error, SearchCacheKey, SearchConfig, SearchResults, WebResult};

use crate::browser::{BrowserManager, BrowserOptions, PageProvider};
use crate::engines::{Engine, collect_results, engine_for};

/// Open the result cache at `path` and drop entries that have expired.
///
/// A failed purge is logged; the cache is still usable.
pub async fn open_cache(path: impl AsRef<Path>) -> Result<CacheDb, Error> {
    let cache = CacheDb::open(path).await?;
    match cache.purge_expired_search().await {
        Ok(0) => {}
        Ok(purged) => tracing::debug!(purged, "purged expired cache entries"),
        Err(e) => tracing::warn!("failed to purge expired cache entries: {e}"),
    }
    Ok(cache)
}

/// Runs searches for one configuration.
pub struct SearchTool<P: PageProvider = BrowserManager> {
    config: SearchConfig,
    engine: Box<dyn Engine>,
    provider: P,
    cache: Option<CacheDb>,
    refresh: bool,
}

impl SearchTool<BrowserManager> {
    /// Create a tool backed by a real browser.
    ///
    /// The browser is launched on the first search.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if `config` is invalid.
    pub fn new(config: SearchConfig, app: &AppConfig) -> Result<Self, Error> {
        let config = config.normalized()?;
        let manager = BrowserManager::new(BrowserOptions::from_config(app, &config));
        Self::with_provider(config, manager)
    }
}

impl<P: PageProvider> SearchTool<P> {
    /// Create a tool that gets its pages from `provider`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if `config` is invalid.
    pub fn with_provider(config: SearchConfig, provider: P) -> Result<Self, Error> {
        let config = config.normalized()?;
        let engine = engine_for(&config)?;
        Ok(Self { config, engine, provider, cache: None, refresh: false })
    }

    /// Serve and store results through `cache`.
    pub fn with_cache(mut self, cache: CacheDb) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Skip cache reads; fresh results are still written back.
    pub fn refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Search for `query`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` for a blank query and
    /// `Error::SearchEngine` when the engine could not produce results.
    /// Cache failures are logged and never fail a search.
    pub async fn search(&self, query: &str) -> Result<SearchResults, Error> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::Configuration("search query cannot be empty".into()));
        }

        let engine = self.engine.kind();
        let key = SearchCacheKey::new(query, &self.config);

        if !self.refresh
            && let Some(cache) = &self.cache
        {
            match cache.get_search(&key).await {
                Ok(Some(cached)) => {
                    tracing::debug!(%engine, query, "cache hit");
                    return Ok(cached);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("failed to read search cache: {e}"),
            }
        }

        let started = Instant::now();
        let web_results = self.fetch(query).await.map_err(|e| {
            Error::SearchEngine(format!("error while searching with {engine} for query '{query}': {e}"))
        })?;

        let mut results = SearchResults::new(query, engine, web_results);
        results.page_load_time_ms = Some(u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX));
        tracing::info!(%engine, query, count = results.web_results.len(), "search finished");

        if let Some(cache) = &self.cache
            && !results.is_empty()
        {
            let ttl = self.config.time_range.cache_ttl_seconds();
            if let Err(e) = cache.put_search(&key, &results, ttl).await {
                tracing::warn!("failed to cache search results: {e}");
            }
        }

        Ok(results)
    }

    /// Open the engine's pages, collect results and release every page.
    async fn fetch(&self, query: &str) -> Result<Vec<WebResult>, Error> {
        let pages = self.provider.open_pages(self.engine.pages_needed()).await?;
        tracing::debug!(engine = %self.engine.kind(), pages = pages.len(), "opened result pages");

        let outcome = collect_results(self.engine.as_ref(), &pages, query, self.config.num_results).await;
        for page in pages {
            self.provider.release(page).await;
        }
        outcome
    }

    /// Shut down the browser. Safe to call more than once.
    pub async fn close(&self) -> Result<(), Error> {
        self.provider.shutdown().await?;
        Ok(())
    }
}
