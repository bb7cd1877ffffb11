//! Search cache key generation.

use sha2::{Digest, Sha256};

use crate::config::SearchConfig;

/// Cache key for a search: a SHA-256 hash of the query and every setting
/// that changes what the engine returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCacheKey(String);

impl SearchCacheKey {
    pub fn new(query: &str, config: &SearchConfig) -> Self {
        let params = serde_json::json!({
            "engine": config.search_engine.as_str(),
            "q": query.trim(),
            "num_results": config.num_results,
            "language": config.language,
            "region": config.region,
            "safe_search": config.safe_search.as_str(),
            "time_range": config.time_range.as_str(),
        });

        let mut hasher = Sha256::new();
        hasher.update(params.to_string().as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
