//! Client code for search-tool.
//!
//! This crate drives a headless browser against search engines and turns
//! the rendered result pages into structured results:
//!
//! - `browser`: browser lifecycle, pages and the `SerpPage` seam
//! - `parsers`: HTML → `WebResult` extraction per engine
//! - `engines`: URL construction and page interaction per engine
//! - `tool`: the `SearchTool` entry point with optional caching

pub mod browser;
pub mod engines;
pub mod parsers;
pub mod tool;

pub use browser::{BrowserError, BrowserManager, BrowserOptions, BrowserPage, PageProvider, SerpPage};
pub use engines::{BraveEngine, DuckDuckGoEngine, Engine, GoogleEngine, collect_results, engine_for};
pub use parsers::{BraveParser, DuckDuckGoParser, GoogleParser, ResultParser};
pub use tool::{SearchTool, open_cache};
