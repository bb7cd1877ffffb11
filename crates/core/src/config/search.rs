//! Per-search configuration: engine selection, result count and filters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Hard upper bound on results requested from a single search.
pub const MAX_RESULTS: usize = 500;

/// Supported search engines.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    #[default]
    Google,
    #[serde(alias = "ddg")]
    DuckDuckGo,
    Brave,
}

impl SearchEngine {
    /// All engines, in registry order.
    pub const ALL: [SearchEngine; 3] = [SearchEngine::Google, SearchEngine::DuckDuckGo, SearchEngine::Brave];

    /// Canonical lowercase name, also used as `search_engine` on results.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchEngine::Google => "google",
            SearchEngine::DuckDuckGo => "duckduckgo",
            SearchEngine::Brave => "brave",
        }
    }
}

impl fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchEngine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" => Ok(SearchEngine::Google),
            "duckduckgo" | "ddg" => Ok(SearchEngine::DuckDuckGo),
            "brave" => Ok(SearchEngine::Brave),
            other => {
                let supported: Vec<&str> = SearchEngine::ALL.iter().map(SearchEngine::as_str).collect();
                Err(Error::Configuration(format!(
                    "invalid search engine '{other}'; supported engines are: {}",
                    supported.join(", ")
                )))
            }
        }
    }
}

/// Safe search filtering levels.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SafeSearch {
    #[default]
    Off,
    Moderate,
    On,
}

impl SafeSearch {
    pub fn as_str(&self) -> &'static str {
        match self {
            SafeSearch::Off => "off",
            SafeSearch::Moderate => "moderate",
            SafeSearch::On => "on",
        }
    }
}

impl fmt::Display for SafeSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SafeSearch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "off" => Ok(SafeSearch::Off),
            "moderate" => Ok(SafeSearch::Moderate),
            "on" => Ok(SafeSearch::On),
            other => Err(Error::Configuration(format!("invalid safe search level '{other}' (off, moderate, on)"))),
        }
    }
}

/// Recency filter applied to results.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    #[default]
    Any,
    PastDay,
    PastWeek,
    PastMonth,
    PastYear,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Any => "any",
            TimeRange::PastDay => "past_day",
            TimeRange::PastWeek => "past_week",
            TimeRange::PastMonth => "past_month",
            TimeRange::PastYear => "past_year",
        }
    }

    /// Cache lifetime for results filtered by this range, in seconds.
    pub fn cache_ttl_seconds(&self) -> i64 {
        match self {
            TimeRange::PastDay => 3600,
            TimeRange::PastWeek => 21600,
            TimeRange::PastMonth => 43200,
            TimeRange::PastYear => 86400,
            TimeRange::Any => 21600,
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "any" => Ok(TimeRange::Any),
            "past_day" | "day" => Ok(TimeRange::PastDay),
            "past_week" | "week" => Ok(TimeRange::PastWeek),
            "past_month" | "month" => Ok(TimeRange::PastMonth),
            "past_year" | "year" => Ok(TimeRange::PastYear),
            other => Err(Error::Configuration(format!(
                "invalid time range '{other}' (any, past_day, past_week, past_month, past_year)"
            ))),
        }
    }
}

/// Settings for a single search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub search_engine: SearchEngine,

    /// Number of results to return (1..=MAX_RESULTS).
    #[serde(default = "default_num_results")]
    pub num_results: usize,

    /// Interface/content language, e.g. "en" or "en-US".
    #[serde(default)]
    pub language: Option<String>,

    /// Region code, e.g. "us".
    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub safe_search: SafeSearch,

    #[serde(default)]
    pub time_range: TimeRange,

    #[serde(default)]
    pub user_agent: Option<String>,

    /// Proxy server passed to the browser, e.g. "http://127.0.0.1:8080".
    #[serde(default)]
    pub proxy: Option<String>,

    #[serde(default = "default_headless")]
    pub headless: bool,
}

fn default_num_results() -> usize {
    10
}

fn default_headless() -> bool {
    true
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            search_engine: SearchEngine::default(),
            num_results: default_num_results(),
            language: None,
            region: None,
            safe_search: SafeSearch::default(),
            time_range: TimeRange::default(),
            user_agent: None,
            proxy: None,
            headless: default_headless(),
        }
    }
}

impl SearchConfig {
    /// Default settings for the given engine.
    pub fn for_engine(search_engine: SearchEngine) -> Self {
        Self { search_engine, ..Default::default() }
    }

    /// Validate and normalize the configuration.
    ///
    /// `num_results` must be at least 1 and is clamped to [`MAX_RESULTS`].
    /// Blank optional strings are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if `num_results` is 0.
    pub fn normalized(mut self) -> Result<Self, Error> {
        if self.num_results == 0 {
            return Err(Error::Configuration("num_results must be at least 1".into()));
        }
        self.num_results = self.num_results.min(MAX_RESULTS);

        for field in [&mut self.language, &mut self.region, &mut self.user_agent, &mut self.proxy] {
            if field.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *field = None;
            }
        }

        Ok(self)
    }

    /// Primary language subtag, e.g. "en" for "en-US".
    pub fn language_code(&self) -> Option<&str> {
        self.language.as_deref().map(|lang| lang.split('-').next().unwrap_or(lang))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_search_config() {
        let config = SearchConfig::default();
        assert_eq!(config.search_engine, SearchEngine::Google);
        assert_eq!(config.num_results, 10);
        assert_eq!(config.safe_search, SafeSearch::Off);
        assert_eq!(config.time_range, TimeRange::Any);
        assert!(config.headless);
        assert!(config.language.is_none());
    }

    #[test]
    fn test_num_results_clamped() {
        let config = SearchConfig { num_results: 10_000, ..Default::default() }.normalized().unwrap();
        assert_eq!(config.num_results, MAX_RESULTS);
    }

    #[test]
    fn test_num_results_zero_rejected() {
        let result = SearchConfig { num_results: 0, ..Default::default() }.normalized();
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_blank_strings_become_none() {
        let config =
            SearchConfig { language: Some("  ".into()), proxy: Some(String::new()), ..Default::default() }
                .normalized()
                .unwrap();
        assert!(config.language.is_none());
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_engine_from_str_aliases() {
        assert_eq!("google".parse::<SearchEngine>().unwrap(), SearchEngine::Google);
        assert_eq!("ddg".parse::<SearchEngine>().unwrap(), SearchEngine::DuckDuckGo);
        assert_eq!("DuckDuckGo".parse::<SearchEngine>().unwrap(), SearchEngine::DuckDuckGo);
        assert_eq!("brave".parse::<SearchEngine>().unwrap(), SearchEngine::Brave);
    }

    #[test]
    fn test_engine_from_str_invalid_lists_supported() {
        let err = "bing".parse::<SearchEngine>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("bing"));
        assert!(msg.contains("google, duckduckgo, brave"));
    }

    #[test]
    fn test_engine_serde_alias() {
        let engine: SearchEngine = serde_json::from_str("\"ddg\"").unwrap();
        assert_eq!(engine, SearchEngine::DuckDuckGo);
        assert_eq!(serde_json::to_string(&SearchEngine::DuckDuckGo).unwrap(), "\"duckduckgo\"");
    }

    #[test]
    fn test_time_range_parse_and_ttl() {
        assert_eq!("past-week".parse::<TimeRange>().unwrap(), TimeRange::PastWeek);
        assert_eq!(TimeRange::PastDay.cache_ttl_seconds(), 3600);
        assert_eq!(TimeRange::PastWeek.cache_ttl_seconds(), 21600);
        assert_eq!(TimeRange::PastMonth.cache_ttl_seconds(), 43200);
        assert_eq!(TimeRange::PastYear.cache_ttl_seconds(), 86400);
        assert_eq!(TimeRange::Any.cache_ttl_seconds(), 21600);
        assert!("fortnight".parse::<TimeRange>().is_err());
    }

    #[test]
    fn test_safe_search_parse() {
        assert_eq!("moderate".parse::<SafeSearch>().unwrap(), SafeSearch::Moderate);
        assert!("strict".parse::<SafeSearch>().is_err());
    }

    #[test]
    fn test_language_code() {
        let config = SearchConfig { language: Some("en-US".into()), ..Default::default() };
        assert_eq!(config.language_code(), Some("en"));

        let config = SearchConfig { language: Some("de".into()), ..Default::default() };
        assert_eq!(config.language_code(), Some("de"));
    }
}
