//! Scrape orchestration - search once, then fetch every result in parallel
//!
//! The orchestrator runs the link collector to completion, then fans the
//! collected URLs out to a bounded pool of detail fetch workers and drains
//! their outcomes as they finish. One URL failing never aborts the batch.

use crate::config::ScraperConfig;
use crate::crawler::browser::BrowserLauncher;
use crate::crawler::collector::{LinkCollector, LinkSource};
use crate::crawler::fetcher::{DetailFetcher, DetailSource};
use crate::model::{FetchOutcome, MovieRecord};
use crate::ValidationError;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Outcome of a whole scrape run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeReport {
    /// Records in completion order, not URL order
    pub records: Vec<MovieRecord>,

    /// Number of detail pages that produced a record
    pub succeeded: usize,

    /// Number of detail pages that failed or whose worker died
    pub failed: usize,
}

impl ScrapeReport {
    /// Total number of detail pages attempted
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Composes a [`LinkSource`] with a worker pool over a [`DetailSource`]
pub struct Orchestrator {
    links: Arc<dyn LinkSource>,
    details: Arc<dyn DetailSource>,
    max_workers: usize,
}

impl Orchestrator {
    /// Creates an orchestrator from its two stages
    ///
    /// `max_workers` bounds how many detail fetches are in flight at once,
    /// independently of how many URLs are collected.
    pub fn new(
        links: impl LinkSource + 'static,
        details: impl DetailSource + 'static,
        max_workers: usize,
    ) -> Self {
        Self {
            links: Arc::new(links),
            details: Arc::new(details),
            max_workers: max_workers.max(1),
        }
    }

    /// Wires the standard collector and HTTP detail fetcher from configuration
    pub fn from_config(
        config: Arc<ScraperConfig>,
        launcher: impl BrowserLauncher + 'static,
    ) -> Result<Self, reqwest::Error> {
        let details = DetailFetcher::new(config.clone())?;
        let max_workers = config.max_workers;
        let links = LinkCollector::new(launcher, config);
        Ok(Self::new(links, details, max_workers))
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Searches for `query` and fetches the details of every result
    ///
    /// Only request validation errors are returned. Everything else (a failed
    /// listing session, failed pages) is logged and reflected in the report.
    pub async fn run(&self, query: &str, max_pages: i64) -> Result<ScrapeReport, ValidationError> {
        let urls = match self.links.collect(query, max_pages).await? {
            Some(urls) if !urls.is_empty() => urls,
            _ => {
                tracing::warn!("No movie links found");
                return Ok(ScrapeReport::default());
            }
        };

        Ok(self.fetch_all(urls).await)
    }

    /// Fetches every URL through the worker pool and aggregates the outcomes
    ///
    /// Tasks are submitted in URL order; outcomes are consumed in completion
    /// order. Every URL contributes exactly one success or one failure.
    pub async fn fetch_all(&self, urls: Vec<Url>) -> ScrapeReport {
        let total = urls.len();
        let permits = Arc::new(Semaphore::new(self.max_workers));
        let mut tasks = JoinSet::new();

        tracing::info!(
            "Fetching {} movie pages with {} workers",
            total,
            self.max_workers
        );

        for url in urls {
            let permits = permits.clone();
            let details = self.details.clone();

            tasks.spawn(async move {
                let _permit = match permits.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return FetchOutcome::Failed {
                            url: url.to_string(),
                        }
                    }
                };
                details.fetch_detail(url.as_str()).await
            });
        }

        let mut report = ScrapeReport::default();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(FetchOutcome::Record(record)) => {
                    tracing::info!("Successfully scraped movie details: {}", record.title);
                    report.records.push(record);
                    report.succeeded += 1;
                }
                Ok(FetchOutcome::Failed { url }) => {
                    tracing::debug!("No record for {}", url);
                    report.failed += 1;
                }
                Err(e) => {
                    tracing::error!("Failed to get movie details: worker {}", e);
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            "Completed scraping: {} successful, {} failed",
            report.succeeded,
            report.failed
        );

        report
    }
}
