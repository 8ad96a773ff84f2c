//! Search-result link collection
//!
//! The listing is rendered by JavaScript and grows through a "load more"
//! control, so it is driven through a [`BrowserSession`] rather than fetched
//! over plain HTTP. One session is opened per collection and always closed
//! before returning.

use crate::config::ScraperConfig;
use crate::crawler::browser::{BrowserError, BrowserLauncher, BrowserSession};
use crate::crawler::parser::extract_movie_links;
use crate::model::{PageBudget, SearchQuery};
use crate::ValidationError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// How often the result count is re-read after a "load more" click
const GROWTH_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Turns a query into an ordered list of detail page URLs
#[async_trait]
pub trait LinkSource: Send + Sync {
    /// Collects detail page URLs for `query`, loading at most `max_pages` listing pages
    ///
    /// Invalid input is rejected before any I/O. `Ok(None)` means the listing
    /// session failed as a whole; `Ok(Some(vec![]))` means it worked and found
    /// nothing.
    async fn collect(
        &self,
        query: &str,
        max_pages: i64,
    ) -> Result<Option<Vec<Url>>, ValidationError>;
}

/// Collects result links by paginating the search listing in a browser
pub struct LinkCollector {
    launcher: Box<dyn BrowserLauncher>,
    config: Arc<ScraperConfig>,
}

impl LinkCollector {
    pub fn new(launcher: impl BrowserLauncher + 'static, config: Arc<ScraperConfig>) -> Self {
        Self {
            launcher: Box::new(launcher),
            config,
        }
    }

    /// Validated entry point; see [`LinkSource::collect`]
    pub async fn collect_links(
        &self,
        query: &SearchQuery,
        budget: PageBudget,
    ) -> Option<Vec<Url>> {
        let search_url = match self.config.search_url(query) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Failed to build search URL: {}", e);
                return None;
            }
        };

        let mut session = match self.launcher.launch(&self.config.user_agent).await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!("Failed to get movie links: {}", e);
                return None;
            }
        };

        let result = self.drive(session.as_mut(), &search_url, budget).await;

        if let Err(e) = session.close().await {
            tracing::warn!("Failed to close browser session: {}", e);
        }

        match result {
            Ok(links) => {
                tracing::info!("Found {} movie links", links.len());
                Some(links)
            }
            Err(e) => {
                tracing::error!("Failed to get movie links: {}", e);
                None
            }
        }
    }

    async fn drive(
        &self,
        session: &mut dyn BrowserSession,
        search_url: &Url,
        budget: PageBudget,
    ) -> Result<Vec<Url>, BrowserError> {
        tracing::debug!("Opening search listing {}", search_url);
        session.navigate(search_url).await?;

        if budget.expansions() > 0 {
            let loaded = self.load_more_pages(session, budget.expansions()).await;
            tracing::debug!("Listing expanded to {} of {} pages", loaded, budget.get());
        }

        let content = session.rendered_content().await?;
        Ok(extract_movie_links(
            &content,
            &self.config.selectors,
            &self.config.base_url,
        ))
    }

    /// Clicks "load more" up to `expansions` times
    ///
    /// A timeout means the listing is exhausted. Any other click failure also
    /// ends pagination; neither fails the collection. Returns the number of
    /// listing pages loaded, counting the first.
    async fn load_more_pages(&self, session: &mut dyn BrowserSession, expansions: u32) -> u32 {
        let mut loaded = 1;

        for _ in 0..expansions {
            match self.load_more(session).await {
                Ok(links) => {
                    loaded += 1;
                    tracing::info!("Loaded page {} ({} links)", loaded, links);
                }
                Err(e) if e.is_timeout() => {
                    tracing::info!("No more content to load");
                    break;
                }
                Err(e) => {
                    tracing::error!("Error loading more content: {}", e);
                    break;
                }
            }
        }

        loaded
    }

    /// One expansion: click "load more" and wait for new results to render
    ///
    /// Succeeds only once more result links are on the page than before the
    /// click, returning the new count. A listing that does not grow within
    /// `load_more_timeout` is reported as a timeout.
    async fn load_more(&self, session: &mut dyn BrowserSession) -> Result<usize, BrowserError> {
        let selectors = &self.config.selectors;
        let timeout = self.config.load_more_timeout;

        let before = session.count(&selectors.result_link).await?;
        session.wait_and_click(&selectors.load_more, timeout).await?;

        let grown = tokio::time::timeout(timeout, async {
            loop {
                let now = session.count(&selectors.result_link).await?;
                if now > before {
                    return Ok::<usize, BrowserError>(now);
                }
                tokio::time::sleep(GROWTH_POLL_INTERVAL).await;
            }
        })
        .await;

        match grown {
            Ok(result) => result,
            Err(_) => {
                tracing::debug!("Listing stayed at {} links after clicking load more", before);
                Err(BrowserError::Timeout {
                    selector: selectors.result_link.clone(),
                    timeout,
                })
            }
        }
    }
}

#[async_trait]
impl LinkSource for LinkCollector {
    async fn collect(
        &self,
        query: &str,
        max_pages: i64,
    ) -> Result<Option<Vec<Url>>, ValidationError> {
        let query = SearchQuery::parse(query)?;
        let budget = PageBudget::new(max_pages)?;
        Ok(self.collect_links(&query, budget).await)
    }
}
