//! Core types and shared functionality for search-tool.
//!
//! This crate provides:
//! - Search configuration and result models
//! - Unified error types
//! - Layered application configuration
//! - Search result cache with SQLite backend

pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use cache::{CacheDb, SearchCacheKey};
pub use config::{AppConfig, ConfigError, MAX_RESULTS, SafeSearch, SearchConfig, SearchEngine, TimeRange};
pub use error::Error;
pub use models::{ImageResult, NewsResult, SearchResults, Sitelink, VideoResult, WebResult};
