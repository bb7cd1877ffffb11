//! Headless browser management.
//!
//! A single chromiumoxide browser is launched lazily with a persistent
//! profile and hands out tabs to the engines. A background task polls the
//! DevTools protocol handler for as long as the browser lives.

mod error;
mod page;

pub use error::BrowserError;
pub use page::{BrowserPage, SerpPage};

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::handler::viewport::Viewport;
use futures_util::StreamExt;
use search_tool_core::{AppConfig, SearchConfig};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Desktop Chrome user agent used unless overridden.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/136.0.0.0 Safari/537.36";

/// Viewport applied to every tab.
pub const VIEWPORT: (u32, u32) = (1920, 1080);

/// How long a closed browser gets to exit before it is killed.
const EXIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs before any page script so the session looks like a regular browser.
const STEALTH_SCRIPT: &str = r#"
Object.defineProperty(navigator, 'webdriver', {get: () => false});
window.navigator.chrome = {runtime: {}};
Object.defineProperty(navigator, 'languages', {get: () => ['en-US', 'en']});
Object.defineProperty(navigator, 'plugins', {get: () => [1, 2, 3, 4, 5]});
"#;

/// Source of result pages for a search.
///
/// Implemented by [`BrowserManager`]; tests substitute scripted pages.
#[async_trait::async_trait]
pub trait PageProvider: Send + Sync {
    type Page: SerpPage + 'static;

    /// Open `count` fresh pages.
    async fn open_pages(&self, count: usize) -> Result<Vec<Self::Page>, BrowserError>;

    /// Close a page. Failures are logged, never propagated.
    async fn release(&self, page: Self::Page);

    /// Shut down the underlying browser, if any. Idempotent.
    async fn shutdown(&self) -> Result<(), BrowserError>;
}

/// Browser launch settings.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub headless: bool,
    pub user_agent: String,
    pub proxy: Option<String>,
    pub user_data_dir: PathBuf,
    pub chrome_executable: Option<PathBuf>,
    pub navigation_timeout: Duration,
    pub settle_delay: Duration,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        let app = AppConfig::default();
        Self {
            headless: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
            user_data_dir: app.user_data_dir.clone(),
            chrome_executable: None,
            navigation_timeout: app.navigation_timeout(),
            settle_delay: app.settle(),
        }
    }
}

impl BrowserOptions {
    /// Combine application settings with the per-search browser settings.
    pub fn from_config(app: &AppConfig, search: &SearchConfig) -> Self {
        Self {
            headless: search.headless,
            user_agent: search.user_agent.clone().unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            proxy: search.proxy.clone(),
            user_data_dir: app.user_data_dir.clone(),
            chrome_executable: app.chrome_executable.clone(),
            navigation_timeout: app.navigation_timeout(),
            settle_delay: app.settle(),
        }
    }

    /// Command-line switches passed to Chrome.
    pub fn launch_args(&self) -> Vec<String> {
        let mut args = vec![
            "--disable-blink-features=AutomationControlled".to_string(),
            "--start-maximized".to_string(),
            format!("--user-agent={}", self.user_agent),
        ];
        if let Some(proxy) = &self.proxy {
            args.push(format!("--proxy-server={proxy}"));
        }
        args
    }

    fn browser_config(&self) -> Result<BrowserConfig, BrowserError> {
        let mut builder = BrowserConfig::builder()
            .user_data_dir(&self.user_data_dir)
            .window_size(VIEWPORT.0, VIEWPORT.1)
            .viewport(Viewport { width: VIEWPORT.0, height: VIEWPORT.1, ..Default::default() })
            .request_timeout(self.navigation_timeout)
            .args(self.launch_args());

        if !self.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &self.chrome_executable {
            builder = builder.chrome_executable(executable);
        }

        builder.build().map_err(BrowserError::Launch)
    }
}

struct RunningBrowser {
    browser: Browser,
    handler: JoinHandle<()>,
}

/// Owns the browser process and hands out tabs.
pub struct BrowserManager {
    options: BrowserOptions,
    running: Mutex<Option<RunningBrowser>>,
}

impl BrowserManager {
    /// Create a manager. The browser is not launched until a page is requested.
    pub fn new(options: BrowserOptions) -> Self {
        Self { options, running: Mutex::new(None) }
    }

    pub fn options(&self) -> &BrowserOptions {
        &self.options
    }

    /// Whether a browser process is currently running.
    pub async fn is_running(&self) -> bool {
        self.running.lock().await.is_some()
    }

    async fn launch(&self) -> Result<RunningBrowser, BrowserError> {
        std::fs::create_dir_all(&self.options.user_data_dir).map_err(|e| {
            BrowserError::Launch(format!(
                "cannot create profile directory {}: {e}",
                self.options.user_data_dir.display()
            ))
        })?;

        let (browser, mut handler) = Browser::launch(self.options.browser_config()?)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("browser handler event error: {e}");
                }
            }
        });

        tracing::info!(headless = self.options.headless, "launched browser");
        Ok(RunningBrowser { browser, handler })
    }

    /// Open a blank tab with the stealth script installed.
    async fn new_page(&self, browser: &Browser) -> Result<BrowserPage, BrowserError> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::NewPage(e.to_string()))?;
        page.evaluate_on_new_document(AddScriptToEvaluateOnNewDocumentParams::new(STEALTH_SCRIPT))
            .await
            .map_err(|e| BrowserError::NewPage(e.to_string()))?;
        Ok(BrowserPage::new(page, self.options.navigation_timeout, self.options.settle_delay))
    }
}

#[async_trait::async_trait]
impl PageProvider for BrowserManager {
    type Page = BrowserPage;

    async fn open_pages(&self, count: usize) -> Result<Vec<BrowserPage>, BrowserError> {
        let mut running = self.running.lock().await;
        if running.is_none() {
            *running = Some(self.launch().await?);
        }
        let browser = &running.as_ref().ok_or(BrowserError::Closed)?.browser;

        let mut pages = Vec::with_capacity(count);
        for _ in 0..count {
            match self.new_page(browser).await {
                Ok(page) => pages.push(page),
                Err(e) => {
                    for page in pages {
                        if let Err(close_err) = page.close().await {
                            tracing::warn!("error closing page: {close_err}");
                        }
                    }
                    return Err(e);
                }
            }
        }
        Ok(pages)
    }

    async fn release(&self, page: BrowserPage) {
        if let Err(e) = page.close().await {
            tracing::warn!("error closing page: {e}");
        }
    }

    async fn shutdown(&self) -> Result<(), BrowserError> {
        let Some(RunningBrowser { mut browser, handler }) = self.running.lock().await.take() else {
            return Ok(());
        };

        let closed = browser.close().await;
        if !wait_for_exit(browser.wait(), EXIT_TIMEOUT).await {
            tracing::warn!(timeout_ms = EXIT_TIMEOUT.as_millis() as u64, "browser did not exit; killing it");
            if let Some(Err(e)) = browser.kill().await {
                tracing::warn!("failed to kill browser: {e}");
            }
        }
        handler.abort();
        tracing::info!("browser closed");

        closed.map(|_| ()).map_err(|e| BrowserError::Interaction(e.to_string()))
    }
}

/// Await the browser process exit, returning false if `timeout` elapses first.
async fn wait_for_exit<F, T, E>(exit: F, timeout: Duration) -> bool
where
    F: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    match tokio::time::timeout(timeout, exit).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            tracing::debug!("waiting for browser exit: {e}");
            true
        }
        Err(_) => false,
    }
}
