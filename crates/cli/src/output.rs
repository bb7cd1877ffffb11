//! Terminal rendering of search results and errors.

use std::fmt::Write;

use clap::ValueEnum;
use search_tool_core::{ConfigError, Error, SearchConfig, SearchResults};

const SEPARATOR: &str = "--------------------";

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Numbered, human-readable list.
    Text,
    /// Pretty-printed `SearchResults` JSON.
    Json,
}

/// Line announcing the search about to run.
pub fn header(config: &SearchConfig, query: &str) -> String {
    format!(
        "Searching with {} for: \"{query}\" (Headless: {}, Num Results: {})",
        config.search_engine, config.headless, config.num_results
    )
}

/// Numbered result list, or a notice when nothing was found.
pub fn render_text(results: &SearchResults) -> String {
    if results.web_results.is_empty() {
        return "No results found.\n".to_string();
    }

    let mut out = String::from("\nSearch Results:\n");
    for (idx, result) in results.web_results.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", idx + 1, result.title);
        let _ = writeln!(out, "   URL: {}", result.url);
        if let Some(summary) = result.summary() {
            let _ = writeln!(out, "   Description: {summary}");
        }
        let _ = writeln!(out, "{SEPARATOR}");
    }
    out
}

/// User-facing message for a failed run.
pub fn error_report(err: &anyhow::Error) -> String {
    if let Some(err) = err.downcast_ref::<Error>() {
        return match err {
            Error::SearchEngine(msg) | Error::Blocked(msg) | Error::Browser(msg) => {
                format!("Search Engine Error: {msg}")
            }
            Error::Configuration(msg) => format!("Configuration Error: {msg}"),
            other => format!("An unexpected error occurred: {other}"),
        };
    }
    if let Some(err) = err.downcast_ref::<ConfigError>() {
        return format!("Configuration Error: {err}");
    }
    format!("An unexpected error occurred: {err:#}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_tool_core::{SearchEngine, WebResult};
    use url::Url;

    fn result(title: &str, url: &str) -> WebResult {
        WebResult::new(SearchEngine::Google, title.to_string(), Url::parse(url).unwrap())
    }

    #[test]
    fn test_header() {
        let config = SearchConfig { search_engine: SearchEngine::DuckDuckGo, num_results: 5, ..Default::default() };
        assert_eq!(
            header(&config, "rust lang"),
            "Searching with duckduckgo for: \"rust lang\" (Headless: true, Num Results: 5)"
        );
    }

    #[test]
    fn test_render_no_results() {
        let results = SearchResults::new("q", SearchEngine::Brave, Vec::new());
        assert_eq!(render_text(&results), "No results found.\n");
    }

    #[test]
    fn test_render_results() {
        let mut described = result("Rust", "https://www.rust-lang.org/");
        described.description = Some("Official site".into());
        described.snippet = Some("ignored when a description exists".into());
        let mut snippet_only = result("Docs", "https://docs.rs/");
        snippet_only.snippet = Some("Crate documentation".into());
        let bare = result("Bare", "https://example.com/");

        let results = SearchResults::new("rust", SearchEngine::Google, vec![described, snippet_only, bare]);
        let text = render_text(&results);

        let expected = "\nSearch Results:\n\
            1. Rust\n   URL: https://www.rust-lang.org/\n   Description: Official site\n--------------------\n\
            2. Docs\n   URL: https://docs.rs/\n   Description: Crate documentation\n--------------------\n\
            3. Bare\n   URL: https://example.com/\n--------------------\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_json_round_trip() {
        let web_results = vec![result("Rust", "https://www.rust-lang.org/")];
        let results = SearchResults::new("rust", SearchEngine::Google, web_results);
        let json = serde_json::to_string_pretty(&results).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["search_engine"], "google");
        assert_eq!(value["web_results"][0]["url"], "https://www.rust-lang.org/");
        assert_eq!(value["image_results"], serde_json::json!([]));
    }

    #[test]
    fn test_error_report() {
        let err = anyhow::Error::new(Error::SearchEngine("boom".into()));
        assert_eq!(error_report(&err), "Search Engine Error: boom");

        let err = anyhow::Error::new(Error::Configuration("num_results must be at least 1".into()));
        assert_eq!(error_report(&err), "Configuration Error: num_results must be at least 1");

        let err = anyhow::Error::new(ConfigError::LoadFailed("bad toml".into()));
        assert_eq!(error_report(&err), "Configuration Error: failed to load configuration: bad toml");

        let err = anyhow::anyhow!("disk full");
        assert_eq!(error_report(&err), "An unexpected error occurred: disk full");
    }
}
