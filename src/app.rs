//! Command layer: request validation and the scrape-then-store flow
//!
//! Requests arrive as loosely typed text (CLI flags, query parameters) and
//! are validated here before any browser or network work starts.

use crate::crawler::{Orchestrator, ScrapeReport};
use crate::model::{PageBudget, SearchQuery};
use crate::storage::{ImportSummary, MovieStore};
use crate::ValidationError;

/// A validated scrape request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub query: SearchQuery,
    pub max_pages: PageBudget,
}

impl ScrapeRequest {
    /// Validates raw request parameters
    ///
    /// Checks run in order: both parameters present and non-blank, then
    /// `max_pages` an integer, then `max_pages` within `1..=limit`.
    ///
    /// # Example
    ///
    /// ```
    /// use cinescrape::app::ScrapeRequest;
    ///
    /// let request = ScrapeRequest::parse(Some("Inception"), Some("2"), 10).unwrap();
    /// assert_eq!(request.max_pages.get(), 2);
    /// assert!(ScrapeRequest::parse(Some("Inception"), Some("11"), 10).is_err());
    /// ```
    pub fn parse(
        query: Option<&str>,
        max_pages: Option<&str>,
        limit: u32,
    ) -> Result<Self, ValidationError> {
        let (query, raw_pages) = match (non_blank(query), non_blank(max_pages)) {
            (Some(query), Some(pages)) => (query, pages),
            _ => {
                return Err(ValidationError::MissingParameter(
                    "query, max_pages".to_string(),
                ))
            }
        };

        let pages: i64 = raw_pages
            .trim()
            .parse()
            .map_err(|_| ValidationError::NotANumber(raw_pages.to_string()))?;

        if pages < 1 || pages > i64::from(limit) {
            return Err(ValidationError::PageBudgetOutOfRange {
                value: pages,
                limit,
            });
        }

        Ok(Self {
            query: SearchQuery::parse(query)?,
            max_pages: PageBudget::new(pages)?,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Counts from a scrape followed by an import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeImport {
    /// Detail pages that produced a record
    pub succeeded: usize,

    /// Detail pages that failed
    pub failed: usize,

    pub summary: ImportSummary,
}

/// Runs `request` through the orchestrator and returns the raw report
pub async fn run_scrape(
    orchestrator: &Orchestrator,
    request: &ScrapeRequest,
) -> crate::Result<ScrapeReport> {
    tracing::info!(
        "Scraping '{}' across up to {} listing pages",
        request.query,
        request.max_pages.get()
    );

    let report = orchestrator
        .run(request.query.as_str(), i64::from(request.max_pages.get()))
        .await?;
    Ok(report)
}

/// Scrapes `request` and stores every extracted record in one transaction
pub async fn run_scrape_import<S: MovieStore>(
    orchestrator: &Orchestrator,
    store: &mut S,
    request: &ScrapeRequest,
) -> crate::Result<ScrapeImport> {
    let report = run_scrape(orchestrator, request).await?;
    let summary = store.import_records(&report.records)?;

    Ok(ScrapeImport {
        succeeded: report.succeeded,
        failed: report.failed,
        summary,
    })
}
