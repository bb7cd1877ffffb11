//! Browser automation error types.

use thiserror::Error;

/// Errors that can occur while driving the browser.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Failed to launch or connect to browser.
    #[error("browser launch failed: {0} (install Chrome/Chromium or set SEARCH_TOOL_CHROME_EXECUTABLE)")]
    Launch(String),

    /// Failed to open a new tab.
    #[error("failed to create new page: {0}")]
    NewPage(String),

    /// Failed to navigate to URL.
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// Timeout waiting for navigation.
    #[error("navigation to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    /// Script evaluation or element interaction failed.
    #[error("page interaction failed: {0}")]
    Interaction(String),

    /// Failed to get page content.
    #[error("content retrieval failed: {0}")]
    ContentRetrieval(String),

    /// Browser closed unexpectedly.
    #[error("browser closed unexpectedly")]
    Closed,
}

impl From<BrowserError> for search_tool_core::Error {
    fn from(err: BrowserError) -> Self {
        search_tool_core::Error::Browser(err.to_string())
    }
}
