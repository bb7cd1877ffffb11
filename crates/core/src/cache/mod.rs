//! SQLite-backed cache for search results.
//!
//! This module provides a persistent cache using SQLite with async access via
//! tokio-rusqlite. It supports:
//!
//! - Stable request keys using SHA-256 hashing
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - Expiry-based purging

pub mod connection;
pub mod hash;
pub mod migrations;
pub mod search;

pub use crate::Error;

pub use connection::CacheDb;
pub use hash::SearchCacheKey;
pub use search::SearchCacheMeta;
