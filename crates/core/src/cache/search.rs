//! Search cache operations.
//!
//! Stores serialized `SearchResults` keyed by [`SearchCacheKey`] with an expiry time.

use super::connection::CacheDb;
use super::hash::SearchCacheKey;
use crate::{Error, SearchResults};
use chrono::{Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;

/// Cached search entry metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCacheMeta {
    pub engine: String,
    pub query: String,
    pub fetched_at: String,
    pub expires_at: String,
}

/// Fixed-width UTC timestamps so that string comparison orders correctly.
fn timestamp(at: chrono::DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl CacheDb {
    /// Get unexpired cached results for a key.
    ///
    /// Returns None if the key doesn't exist or the entry has expired.
    pub async fn get_search(&self, key: &SearchCacheKey) -> Result<Option<SearchResults>, Error> {
        let key_hash = key.as_str().to_string();
        let now = timestamp(Utc::now());
        let json = self
            .conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let mut stmt =
                    conn.prepare("SELECT response_json FROM search_cache WHERE key_hash = ?1 AND expires_at > ?2")?;

                match stmt.query_row(params![key_hash, now], |row| row.get(0)) {
                    Ok(json) => Ok(Some(json)),
                    Err(tokio_rusqlite::rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        json.map(|json| serde_json::from_str(&json).map_err(Error::from)).transpose()
    }

    /// Get cache metadata for a key, expired or not.
    pub async fn get_search_meta(&self, key: &SearchCacheKey) -> Result<Option<SearchCacheMeta>, Error> {
        let key_hash = key.as_str().to_string();
        self.conn
            .call(move |conn| -> Result<Option<SearchCacheMeta>, Error> {
                let mut stmt = conn
                    .prepare("SELECT engine, query, fetched_at, expires_at FROM search_cache WHERE key_hash = ?1")?;

                let result = stmt.query_row(params![key_hash], |row| {
                    Ok(SearchCacheMeta {
                        engine: row.get(0)?,
                        query: row.get(1)?,
                        fetched_at: row.get(2)?,
                        expires_at: row.get(3)?,
                    })
                });

                match result {
                    Ok(meta) => Ok(Some(meta)),
                    Err(tokio_rusqlite::rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Check if a cache entry exists and is fresh.
    pub async fn is_search_fresh(&self, key: &SearchCacheKey) -> Result<bool, Error> {
        let key_hash = key.as_str().to_string();
        let now = timestamp(Utc::now());
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let fresh: bool = conn.query_row(
                    "SELECT EXISTS(
                        SELECT 1 FROM search_cache
                        WHERE key_hash = ?1
                        AND expires_at > ?2
                    )",
                    params![key_hash, now],
                    |row| row.get(0),
                )?;

                Ok(fresh)
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or replace cached results.
    ///
    /// Uses UPSERT semantics: inserts if the key doesn't exist, updates all fields if it does.
    pub async fn put_search(
        &self, key: &SearchCacheKey, results: &SearchResults, ttl_seconds: i64,
    ) -> Result<(), Error> {
        let key_hash = key.as_str().to_string();
        let engine = results.search_engine.clone();
        let query = results.query.clone();
        let response_json = serde_json::to_string(results)?;

        let now = Utc::now();
        let fetched_at = timestamp(now);
        let expires_at = timestamp(now + Duration::seconds(ttl_seconds));

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO search_cache (key_hash, engine, query, response_json, fetched_at, expires_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    ON CONFLICT(key_hash) DO UPDATE SET
                        engine = excluded.engine,
                        query = excluded.query,
                        response_json = excluded.response_json,
                        fetched_at = excluded.fetched_at,
                        expires_at = excluded.expires_at",
                    params![key_hash, engine, query, response_json, fetched_at, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete expired cache entries.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_expired_search(&self) -> Result<u64, Error> {
        let now = timestamp(Utc::now());
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM search_cache WHERE expires_at <= ?1", params![now])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
