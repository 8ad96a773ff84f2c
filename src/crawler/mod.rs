//! Crawler module: search, paginate, fetch, extract
//!
//! This module contains the scraping engine, including:
//! - Field extraction from detail pages and listing link extraction
//! - HTTP fetching of detail pages with failure classification
//! - Browser-driven pagination of the search listing
//! - Bounded fan-out/fan-in orchestration of detail fetches

mod browser;
mod collector;
mod fetcher;
mod orchestrator;
mod parser;

pub use browser::{BrowserError, BrowserLauncher, BrowserSession, ChromiumLauncher, HttpLauncher};
pub use collector::{LinkCollector, LinkSource};
pub use fetcher::{build_http_client, fetch_page, DetailFetcher, DetailSource, FetchError};
pub use orchestrator::{Orchestrator, ScrapeReport};
pub use parser::{
    extract_credits, extract_movie_links, extract_plot, extract_rating, extract_record,
    extract_release_year, extract_title, parse_movie_page, Credits, Selectors,
};

use crate::config::{ListingEngine, ScraperConfig};
use std::sync::Arc;

/// Wires an orchestrator around the configured listing engine
pub fn build_orchestrator(config: Arc<ScraperConfig>) -> crate::Result<Orchestrator> {
    let orchestrator = match config.listing_engine {
        ListingEngine::Chromium => {
            Orchestrator::from_config(config.clone(), ChromiumLauncher::from_env())?
        }
        ListingEngine::Http => {
            let launcher = HttpLauncher::new(build_http_client(&config)?);
            Orchestrator::from_config(config.clone(), launcher)?
        }
    };
    Ok(orchestrator)
}

/// Runs a complete scrape with the configured listing engine
///
/// This is the main entry point for a scrape. It will:
/// 1. Validate the query and page budget
/// 2. Collect detail page URLs from the search listing
/// 3. Fetch and extract every detail page on the worker pool
///
/// # Returns
///
/// * `Ok(ScrapeReport)` - Records plus success/failure counts (possibly empty)
/// * `Err(CineError::Validation)` - The query or page budget was rejected
/// * `Err(CineError::Http)` - The HTTP client could not be built
pub async fn scrape(
    config: Arc<ScraperConfig>,
    query: &str,
    max_pages: i64,
) -> crate::Result<ScrapeReport> {
    let orchestrator = build_orchestrator(config)?;
    Ok(orchestrator.run(query, max_pages).await?)
}
