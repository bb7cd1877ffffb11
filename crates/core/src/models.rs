//! Search result models.
//!
//! Every engine produces `WebResult`s; the image, video and news variants are
//! part of the result envelope so that consumers see a stable shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::SearchEngine;

/// A deep link shown beneath a web result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sitelink {
    pub title: String,
    pub url: Url,
}

/// An organic web result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebResult {
    pub title: String,
    pub search_engine: String,
    #[serde(default = "Utc::now")]
    pub retrieved_at: DateTime<Utc>,
    pub url: Url,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub display_url: Option<String>,
    #[serde(default)]
    pub raw_html_snippet: Option<String>,
    /// 1-indexed rank within the returned results.
    #[serde(default)]
    pub position: Option<usize>,
    #[serde(default)]
    pub sitelinks: Vec<Sitelink>,
    #[serde(default)]
    pub source_language: Option<String>,
    #[serde(default)]
    pub published_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_pdf: bool,
    #[serde(default)]
    pub is_doc: bool,
}

impl WebResult {
    /// Create a result with the required fields; the remaining fields start empty.
    ///
    /// `is_pdf` and `is_doc` are derived from the URL path.
    pub fn new(engine: SearchEngine, title: impl Into<String>, url: Url) -> Self {
        let path = url.path().to_ascii_lowercase();
        let is_pdf = path.ends_with(".pdf");
        let is_doc = [".doc", ".docx", ".odt", ".rtf"].iter().any(|ext| path.ends_with(ext));

        Self {
            title: title.into(),
            search_engine: engine.as_str().to_string(),
            retrieved_at: Utc::now(),
            url,
            description: None,
            snippet: None,
            display_url: None,
            raw_html_snippet: None,
            position: None,
            sitelinks: Vec::new(),
            source_language: None,
            published_date: None,
            is_pdf,
            is_doc,
        }
    }

    /// Text to show under the title: the description, else the snippet.
    pub fn summary(&self) -> Option<&str> {
        self.description.as_deref().or(self.snippet.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResult {
    pub title: String,
    pub search_engine: String,
    pub retrieved_at: DateTime<Utc>,
    pub image_url: Url,
    pub source_url: Url,
    #[serde(default)]
    pub source_page_title: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<Url>,
    #[serde(default)]
    pub image_format: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoResult {
    pub title: String,
    pub search_engine: String,
    pub retrieved_at: DateTime<Utc>,
    pub url: Url,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub upload_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub thumbnail_url: Option<Url>,
    #[serde(default)]
    pub channel_url: Option<Url>,
    #[serde(default)]
    pub embed_url: Option<Url>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsResult {
    pub title: String,
    pub search_engine: String,
    pub retrieved_at: DateTime<Utc>,
    pub url: Url,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub published_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub thumbnail_url: Option<Url>,
    #[serde(default)]
    pub author: Vec<String>,
}

/// Everything returned by one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: String,
    pub search_engine: String,
    #[serde(default)]
    pub web_results: Vec<WebResult>,
    #[serde(default)]
    pub image_results: Vec<ImageResult>,
    #[serde(default)]
    pub video_results: Vec<VideoResult>,
    #[serde(default)]
    pub news_results: Vec<NewsResult>,
    #[serde(default)]
    pub related_searches: Vec<String>,
    #[serde(default)]
    pub corrected_query: Option<String>,
    #[serde(default)]
    pub total_estimated_results: Option<u64>,
    #[serde(default)]
    pub page_load_time_ms: Option<u64>,
}

impl SearchResults {
    pub fn new(query: impl Into<String>, engine: SearchEngine, web_results: Vec<WebResult>) -> Self {
        Self {
            query: query.into(),
            search_engine: engine.as_str().to_string(),
            web_results,
            image_results: Vec::new(),
            video_results: Vec::new(),
            news_results: Vec::new(),
            related_searches: Vec::new(),
            corrected_query: None,
            total_estimated_results: None,
            page_load_time_ms: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.web_results.is_empty()
            && self.image_results.is_empty()
            && self.video_results.is_empty()
            && self.news_results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_web_result_new() {
        let result = WebResult::new(SearchEngine::Brave, "Rust", url("https://www.rust-lang.org/"));
        assert_eq!(result.search_engine, "brave");
        assert_eq!(result.title, "Rust");
        assert!(result.position.is_none());
        assert!(result.sitelinks.is_empty());
        assert!(!result.is_pdf);
        assert!(!result.is_doc);
    }

    #[test]
    fn test_web_result_document_flags() {
        let pdf = WebResult::new(SearchEngine::Google, "Paper", url("https://example.com/papers/a.PDF"));
        assert!(pdf.is_pdf);

        let doc = WebResult::new(SearchEngine::Google, "Doc", url("https://example.com/report.docx"));
        assert!(doc.is_doc);
        assert!(!doc.is_pdf);
    }

    #[test]
    fn test_summary_prefers_description() {
        let mut result = WebResult::new(SearchEngine::Google, "T", url("https://example.com"));
        assert_eq!(result.summary(), None);

        result.snippet = Some("snippet".into());
        assert_eq!(result.summary(), Some("snippet"));

        result.description = Some("description".into());
        assert_eq!(result.summary(), Some("description"));
    }

    #[test]
    fn test_search_results_json_shape() {
        let results = SearchResults::new(
            "rust",
            SearchEngine::DuckDuckGo,
            vec![WebResult::new(SearchEngine::DuckDuckGo, "Rust", url("https://www.rust-lang.org/"))],
        );
        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(json["query"], "rust");
        assert_eq!(json["search_engine"], "duckduckgo");
        assert_eq!(json["web_results"][0]["url"], "https://www.rust-lang.org/");
        assert!(json["image_results"].as_array().unwrap().is_empty());
        assert!(json["corrected_query"].is_null());
    }

    #[test]
    fn test_search_results_deserialize_minimal() {
        let json = r#"{
            "query": "rust",
            "search_engine": "google",
            "web_results": [
                {"title": "Rust", "search_engine": "google", "url": "https://www.rust-lang.org/"}
            ]
        }"#;
        let results: SearchResults = serde_json::from_str(json).unwrap();
        assert_eq!(results.web_results.len(), 1);
        assert!(results.video_results.is_empty());
        assert!(!results.is_empty());
    }
}
