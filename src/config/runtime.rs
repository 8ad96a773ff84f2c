use crate::config::types::{Config, ListingEngine};
use crate::config::validation::validate;
use crate::crawler::Selectors;
use crate::model::SearchQuery;
use crate::{ConfigError, ConfigResult};
use std::time::Duration;
use url::Url;

/// Immutable settings for one scraping session
///
/// Built once from a validated [`Config`] and shared behind an `Arc` by the
/// link collector and every detail fetch worker. Nothing in here is mutated
/// after construction.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Site root used for search URLs and for resolving relative links
    pub base_url: Url,

    /// Path of the search-results listing
    pub search_path: String,

    /// Identity string sent by both the browser and the HTTP client
    pub user_agent: String,

    /// Compiled extraction selectors
    pub selectors: Selectors,

    /// Worker pool size for detail page fetches
    pub max_workers: usize,

    /// Wait budget for each "load more" activation
    pub load_more_timeout: Duration,

    /// Deadline for a single detail page request
    pub request_timeout: Duration,

    /// How the search listing is rendered
    pub listing_engine: ListingEngine,
}

impl ScraperConfig {
    /// Builds the session configuration, validating it first
    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        validate(config)?;

        let base_url = Url::parse(&config.source.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

        Ok(Self {
            base_url,
            search_path: config.source.search_path.clone(),
            user_agent: config.source.user_agent.clone(),
            selectors: Selectors::compile(&config.selectors)?,
            max_workers: config.scraper.max_workers as usize,
            load_more_timeout: Duration::from_millis(config.scraper.load_more_timeout_ms),
            request_timeout: Duration::from_secs(config.scraper.request_timeout_secs),
            listing_engine: config.scraper.listing_engine,
        })
    }

    /// Builds the listing URL for a query: `<base><search-path>?title=<query>`
    pub fn search_url(&self, query: &SearchQuery) -> ConfigResult<Url> {
        let mut url = self
            .base_url
            .join(&self.search_path)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid search-path: {}", e)))?;
        url.query_pairs_mut().append_pair("title", query.as_str());
        Ok(url)
    }
}
