//! Core data types shared by the crawler, storage and output layers

use crate::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated, non-empty search query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Validates a free-text query
    ///
    /// Surrounding whitespace is stripped; a query that is empty afterwards is
    /// rejected with [`ValidationError::EmptyQuery`].
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Number of listing pages to load: the initial page plus "load more" expansions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PageBudget(u32);

impl PageBudget {
    /// Validates a page budget; anything below 1 is rejected
    pub fn new(pages: i64) -> Result<Self, ValidationError> {
        if pages < 1 {
            return Err(ValidationError::PageBudgetTooSmall(pages));
        }
        let pages = u32::try_from(pages).map_err(|_| ValidationError::PageBudgetOutOfRange {
            value: pages,
            limit: u32::MAX,
        })?;
        Ok(Self(pages))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// How many times the "load more" affordance may be activated
    pub fn expansions(self) -> u32 {
        self.0 - 1
    }
}

impl Default for PageBudget {
    fn default() -> Self {
        Self(1)
    }
}

/// Normalized metadata for one movie, as extracted from its detail page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// Display title; empty when the page had no recognizable title
    pub title: String,

    /// Release year as rendered by the source (free text, e.g. "2010")
    pub release_year: Option<String>,

    /// Aggregate rating on the 0.0–10.0 scale
    pub rating: Option<f64>,

    /// Plot summary; empty when absent
    pub plot: String,

    /// Directors in billing order
    pub director: Vec<String>,

    /// Writers in credit order
    pub writer: Vec<String>,

    /// Stars in billing order
    pub star: Vec<String>,
}

/// Result of fetching a single detail page
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The page was fetched and a record assembled
    Record(MovieRecord),

    /// The page could not be fetched or processed; the cause has been logged
    Failed {
        /// URL of the detail page
        url: String,
    },
}
