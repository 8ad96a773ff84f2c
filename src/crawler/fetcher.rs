//! HTTP fetcher for movie detail pages
//!
//! This module handles the plain-HTTP side of the crawler:
//! - Building the HTTP client with the browser-like identity headers
//! - GET requests for detail pages
//! - Error classification (unreachable source vs. error response)
//! - Turning a fetched page into a [`MovieRecord`]

use crate::config::ScraperConfig;
use crate::crawler::parser::parse_movie_page;
use crate::model::{FetchOutcome, MovieRecord};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, CONNECTION};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use thiserror::Error;

/// Why a single page could not be fetched
#[derive(Debug, Error)]
pub enum FetchError {
    /// The source could not be reached at all (DNS, refused connection, timeout)
    #[error("Failed to connect to {url}: {reason}")]
    Connectivity { url: String, reason: String },

    /// The source answered with a non-success status
    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: StatusCode },

    /// The response body could not be read
    #[error("Failed to read response body from {url}: {reason}")]
    Body { url: String, reason: String },
}

impl FetchError {
    /// True when the source itself was unreachable
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity { .. })
    }
}

/// Builds an HTTP client that presents itself like a desktop browser
///
/// # Arguments
///
/// * `config` - The scraper configuration (identity string and request deadline)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &ScraperConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(config.request_timeout)
        .connect_timeout(config.request_timeout.min(std::time::Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page body, classifying failures
///
/// | Condition | Result |
/// |-----------|--------|
/// | Connect error / timeout | `Connectivity` |
/// | Non-2xx status | `Status` |
/// | Body read failure | `Body` |
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await.map_err(|e| {
        let reason = if e.is_timeout() {
            "request timeout".to_string()
        } else {
            e.to_string()
        };
        FetchError::Connectivity {
            url: url.to_string(),
            reason,
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    response.text().await.map_err(|e| FetchError::Body {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Produces one record per detail page URL
///
/// Implementations must not fail: every problem is logged and reported as
/// [`FetchOutcome::Failed`].
#[async_trait]
pub trait DetailSource: Send + Sync {
    async fn fetch_detail(&self, url: &str) -> FetchOutcome;
}

/// Fetches detail pages over HTTP and extracts their fields
#[derive(Debug, Clone)]
pub struct DetailFetcher {
    client: Client,
    config: Arc<ScraperConfig>,
}

impl DetailFetcher {
    /// Creates a fetcher with its own HTTP client
    pub fn new(config: Arc<ScraperConfig>) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config)?;
        Ok(Self { client, config })
    }

    /// Fetches one detail page and assembles its record
    ///
    /// Returns `None` when the page could not be fetched; the cause is logged
    /// with the URL. Missing fields on a fetched page do not make this fail.
    pub async fn fetch(&self, url: &str) -> Option<MovieRecord> {
        let body = match fetch_page(&self.client, url).await {
            Ok(body) => body,
            Err(e) if e.is_connectivity() => {
                tracing::error!("Could not reach movie source: {}", e);
                return None;
            }
            Err(e) => {
                tracing::error!("Failed to get movie details: {}", e);
                return None;
            }
        };

        let record = parse_movie_page(&body, &self.config.selectors);
        if record.title.is_empty() {
            tracing::warn!("No title found on {}", url);
        }
        Some(record)
    }
}

#[async_trait]
impl DetailSource for DetailFetcher {
    async fn fetch_detail(&self, url: &str) -> FetchOutcome {
        match self.fetch(url).await {
            Some(record) => FetchOutcome::Record(record),
            None => FetchOutcome::Failed {
                url: url.to_string(),
            },
        }
    }
}
