//! Browser tabs as seen by the search engines.

use std::future::Future;
use std::time::Duration;

use chromiumoxide::page::Page;
use url::Url;

use super::BrowserError;

/// Poll interval for selector waits.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// The page operations an engine needs to load and read a result page.
#[async_trait::async_trait]
pub trait SerpPage: Send + Sync {
    /// Navigate to a URL and wait for the document to load.
    async fn goto(&self, url: &Url) -> Result<(), BrowserError>;

    /// Wait until an element matching `selector` is visible.
    ///
    /// Returns `Ok(false)` if the timeout elapses first.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<bool, BrowserError>;

    /// Click the first element matching `selector`.
    async fn click(&self, selector: &str) -> Result<(), BrowserError>;

    /// Scroll to the bottom of the document.
    async fn scroll_to_bottom(&self) -> Result<(), BrowserError>;

    /// Give the page time to finish loading content triggered by an interaction.
    async fn settle(&self);

    async fn title(&self) -> Result<Option<String>, BrowserError>;

    async fn current_url(&self) -> Result<Option<String>, BrowserError>;

    /// Serialized HTML of the current document.
    async fn content(&self) -> Result<String, BrowserError>;
}

/// A chromiumoxide tab.
#[derive(Debug, Clone)]
pub struct BrowserPage {
    page: Page,
    navigation_timeout: Duration,
    settle_delay: Duration,
}

impl BrowserPage {
    pub(crate) fn new(page: Page, navigation_timeout: Duration, settle_delay: Duration) -> Self {
        Self { page, navigation_timeout, settle_delay }
    }

    /// Close the tab.
    pub async fn close(self) -> Result<(), BrowserError> {
        self.page.close().await.map_err(|e| BrowserError::Interaction(e.to_string()))
    }

    async fn is_visible(&self, script: &str) -> Result<bool, BrowserError> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::Interaction(e.to_string()))?
            .into_value::<bool>()
            .map_err(|e| BrowserError::Interaction(e.to_string()))
    }
}

/// Run `check` every [`POLL_INTERVAL`] until it reports true or `timeout` elapses.
///
/// Check errors are retried: the document may be replaced between checks.
async fn poll_until<F, Fut>(mut check: F, timeout: Duration) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, BrowserError>>,
{
    let poll = async {
        loop {
            match check().await {
                Ok(true) => return,
                Ok(false) => {}
                Err(e) => tracing::debug!("visibility check failed, retrying: {e}"),
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    };
    tokio::time::timeout(timeout, poll).await.is_ok()
}

/// JS expression that is true when `selector` matches a rendered element.
fn visibility_script(selector: &str) -> String {
    let quoted = serde_json::to_string(selector).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        "(() => {{ const el = document.querySelector({quoted}); \
         return !!el && !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length); }})()"
    )
}

#[async_trait::async_trait]
impl SerpPage for BrowserPage {
    async fn goto(&self, url: &Url) -> Result<(), BrowserError> {
        tracing::debug!(%url, "navigating");
        match tokio::time::timeout(self.navigation_timeout, self.page.goto(url.as_str())).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::Navigation { url: url.to_string(), reason: e.to_string() }),
            Err(_) => Err(BrowserError::Timeout {
                url: url.to_string(),
                timeout_ms: self.navigation_timeout.as_millis() as u64,
            }),
        }
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<bool, BrowserError> {
        let script = visibility_script(selector);
        Ok(poll_until(|| self.is_visible(&script), timeout).await)
    }

    async fn click(&self, selector: &str) -> Result<(), BrowserError> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| BrowserError::Interaction(format!("{selector}: {e}")))?;
        element
            .click()
            .await
            .map_err(|e| BrowserError::Interaction(format!("{selector}: {e}")))?;
        Ok(())
    }

    async fn scroll_to_bottom(&self) -> Result<(), BrowserError> {
        self.page
            .evaluate("window.scrollTo(0, document.body.scrollHeight)")
            .await
            .map_err(|e| BrowserError::Interaction(e.to_string()))?;
        Ok(())
    }

    async fn settle(&self) {
        tokio::time::sleep(self.settle_delay).await;
    }

    async fn title(&self) -> Result<Option<String>, BrowserError> {
        self.page
            .get_title()
            .await
            .map_err(|e| BrowserError::ContentRetrieval(e.to_string()))
    }

    async fn current_url(&self) -> Result<Option<String>, BrowserError> {
        self.page
            .url()
            .await
            .map_err(|e| BrowserError::ContentRetrieval(e.to_string()))
    }

    async fn content(&self) -> Result<String, BrowserError> {
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::ContentRetrieval(e.to_string()))
    }
}
