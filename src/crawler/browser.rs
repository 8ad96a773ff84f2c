//! Scriptable browser sessions for JavaScript-paginated listings
//!
//! The link collector only needs a few things from a browser: open a URL,
//! click a control once it is usable, count matches while the page grows,
//! and hand back the rendered document.
//! [`BrowserSession`] captures exactly that so the automation engine can be
//! swapped (or faked in tests) without touching the collector.

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use url::Url;

/// How often the page is re-queried while waiting for a control
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Errors raised by a browser session
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Failed to open {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Timed out after {timeout:?} waiting for '{selector}'")]
    Timeout { selector: String, timeout: Duration },

    #[error("Browser interaction failed: {0}")]
    Interaction(String),

    #[error("Failed to read rendered content: {0}")]
    Content(String),
}

impl BrowserError {
    /// True when a wait ran out of time rather than failing outright
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// One live browser tab driven by the collector
#[async_trait]
pub trait BrowserSession: Send {
    /// Loads `url` and waits for the page to finish loading
    async fn navigate(&mut self, url: &Url) -> Result<(), BrowserError>;

    /// Waits up to `timeout` for `selector` to be visible and enabled, then clicks it
    async fn wait_and_click(&mut self, selector: &str, timeout: Duration)
        -> Result<(), BrowserError>;

    /// Number of elements currently matching `selector`
    async fn count(&mut self, selector: &str) -> Result<usize, BrowserError>;

    /// Returns the current DOM serialized as HTML
    async fn rendered_content(&mut self) -> Result<String, BrowserError>;

    /// Shuts the session down; called exactly once on every exit path
    async fn close(&mut self) -> Result<(), BrowserError>;
}

/// Opens browser sessions
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self, user_agent: &str) -> Result<Box<dyn BrowserSession>, BrowserError>;
}

/// Whether a session may shut the whole browser down when it closes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Spawned for this session; closed with it
    Launched,

    /// Shared instance reached over `CHROMIUM_REMOTE_DEBUGGING_URL`; only our tab is closed
    Remote,
}

/// Launches headless Chromium through the DevTools protocol
///
/// When `remote_debugging_url` is set, an already-running Chrome is used
/// instead of spawning a new process.
#[derive(Debug, Clone, Default)]
pub struct ChromiumLauncher {
    remote_debugging_url: Option<String>,
}

impl ChromiumLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `CHROMIUM_REMOTE_DEBUGGING_URL` from the environment
    pub fn from_env() -> Self {
        Self {
            remote_debugging_url: std::env::var("CHROMIUM_REMOTE_DEBUGGING_URL").ok(),
        }
    }

    pub fn with_remote(url: impl Into<String>) -> Self {
        Self {
            remote_debugging_url: Some(url.into()),
        }
    }

    pub fn ownership(&self) -> Ownership {
        if self.remote_debugging_url.is_some() {
            Ownership::Remote
        } else {
            Ownership::Launched
        }
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self, user_agent: &str) -> Result<Box<dyn BrowserSession>, BrowserError> {
        let (browser, mut handler) = if let Some(ref url) = self.remote_debugging_url {
            tracing::info!("Connecting to remote Chrome instance at: {}", url);
            Browser::connect(url.as_str())
                .await
                .map_err(|e| BrowserError::Launch(format!("remote Chrome: {}", e)))?
        } else {
            let config = BrowserConfig::builder()
                .no_sandbox()
                .request_timeout(Duration::from_secs(30))
                .arg(format!("--user-agent={}", user_agent))
                .arg("--disable-gpu")
                .arg("--disable-dev-shm-usage")
                .build()
                .map_err(BrowserError::Launch)?;

            Browser::launch(config)
                .await
                .map_err(|e| BrowserError::Launch(e.to_string()))?
        };

        // The CDP connection only makes progress while its handler is polled
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Box::new(ChromiumSession {
            browser,
            handler_task,
            page: None,
            ownership: self.ownership(),
            user_agent: user_agent.to_string(),
        }))
    }
}

/// A Chromium instance with at most one open tab
struct ChromiumSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: Option<Page>,
    ownership: Ownership,
    user_agent: String,
}

impl ChromiumSession {
    fn page(&self) -> Result<&Page, BrowserError> {
        self.page
            .as_ref()
            .ok_or_else(|| BrowserError::Interaction("no page has been opened".to_string()))
    }

    async fn close_page(&mut self) {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                tracing::debug!("Failed to close tab: {}", e);
            }
        }
    }
}

/// JavaScript that reports whether `selector` is rendered and accepts clicks
fn clickable_script(selector: &str) -> Result<String, BrowserError> {
    let selector = serde_json::to_string(selector)
        .map_err(|e| BrowserError::Interaction(format!("selector '{}': {}", selector, e)))?;

    Ok(format!(
        "(() => {{
            const el = document.querySelector({});
            if (!el || el.disabled || el.getAttribute('aria-disabled') === 'true') return false;
            const style = window.getComputedStyle(el);
            const rect = el.getBoundingClientRect();
            return style.visibility !== 'hidden' && style.display !== 'none'
                && rect.width > 0 && rect.height > 0;
        }})()",
        selector
    ))
}

fn count_script(selector: &str) -> Result<String, BrowserError> {
    let selector = serde_json::to_string(selector)
        .map_err(|e| BrowserError::Interaction(format!("selector '{}': {}", selector, e)))?;
    Ok(format!("document.querySelectorAll({}).length", selector))
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &Url) -> Result<(), BrowserError> {
        let navigation_error = |reason: String| BrowserError::Navigation {
            url: url.to_string(),
            reason,
        };

        self.close_page().await;

        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| navigation_error(e.to_string()))?;

        // A shared remote browser never saw our launch arguments
        page.set_user_agent(self.user_agent.as_str())
            .await
            .map_err(|e| navigation_error(format!("user agent: {}", e)))?;

        // goto waits for the load event
        page.goto(url.as_str())
            .await
            .map_err(|e| navigation_error(e.to_string()))?;

        self.page = Some(page);
        Ok(())
    }

    async fn wait_and_click(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        let page = self.page()?;
        let script = clickable_script(selector)?;

        tokio::time::timeout(timeout, async {
            loop {
                let clickable = match page.evaluate(script.as_str()).await {
                    Ok(result) => result.into_value::<bool>().unwrap_or(false),
                    Err(_) => false,
                };
                if clickable {
                    break;
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        })
        .await
        .map_err(|_| BrowserError::Timeout {
            selector: selector.to_string(),
            timeout,
        })?;

        page.find_element(selector)
            .await
            .map_err(|e| BrowserError::Interaction(format!("find '{}': {}", selector, e)))?
            .click()
            .await
            .map_err(|e| BrowserError::Interaction(format!("click on '{}': {}", selector, e)))?;
        Ok(())
    }

    async fn count(&mut self, selector: &str) -> Result<usize, BrowserError> {
        let script = count_script(selector)?;
        self.page()?
            .evaluate(script.as_str())
            .await
            .map_err(|e| BrowserError::Interaction(format!("count '{}': {}", selector, e)))?
            .into_value::<usize>()
            .map_err(|e| BrowserError::Interaction(format!("count '{}': {}", selector, e)))
    }

    async fn rendered_content(&mut self) -> Result<String, BrowserError> {
        self.page()?
            .content()
            .await
            .map_err(|e| BrowserError::Content(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        let result = match self.ownership {
            Ownership::Remote => {
                self.close_page().await;
                Ok(())
            }
            Ownership::Launched => {
                self.page = None;
                let result = self
                    .browser
                    .close()
                    .await
                    .map(|_| ())
                    .map_err(|e| BrowserError::Interaction(format!("close: {}", e)));
                if let Err(e) = self.browser.wait().await {
                    tracing::debug!("Browser process did not exit cleanly: {}", e);
                }
                result
            }
        };
        self.handler_task.abort();
        result
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

/// Serves listings over plain HTTP without running any JavaScript
///
/// Only the first listing page is ever visible: the "load more" control is
/// reported as absent, so pagination always ends after one page.
#[derive(Debug, Clone)]
pub struct HttpLauncher {
    client: Client,
}

impl HttpLauncher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BrowserLauncher for HttpLauncher {
    async fn launch(&self, _user_agent: &str) -> Result<Box<dyn BrowserSession>, BrowserError> {
        Ok(Box::new(HttpSession {
            client: self.client.clone(),
            body: None,
        }))
    }
}

struct HttpSession {
    client: Client,
    body: Option<String>,
}

#[async_trait]
impl BrowserSession for HttpSession {
    async fn navigate(&mut self, url: &Url) -> Result<(), BrowserError> {
        let navigation_error = |reason: String| BrowserError::Navigation {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| navigation_error(e.to_string()))?
            .error_for_status()
            .map_err(|e| navigation_error(e.to_string()))?;

        self.body = Some(
            response
                .text()
                .await
                .map_err(|e| navigation_error(e.to_string()))?,
        );
        Ok(())
    }

    async fn wait_and_click(
        &mut self,
        selector: &str,
        _timeout: Duration,
    ) -> Result<(), BrowserError> {
        Err(BrowserError::Timeout {
            selector: selector.to_string(),
            timeout: Duration::ZERO,
        })
    }

    async fn count(&mut self, selector: &str) -> Result<usize, BrowserError> {
        let selector = Selector::parse(selector)
            .map_err(|_| BrowserError::Interaction(format!("invalid selector '{}'", selector)))?;
        let body = self.body.as_deref().unwrap_or_default();
        Ok(Html::parse_document(body).select(&selector).count())
    }

    async fn rendered_content(&mut self) -> Result<String, BrowserError> {
        self.body
            .clone()
            .ok_or_else(|| BrowserError::Content("no page has been opened".to_string()))
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        self.body = None;
        Ok(())
    }
}
