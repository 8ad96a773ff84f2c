//! Storage module for persisting scraped movies
//!
//! This module handles all database operations for the catalogue, including:
//! - SQLite database initialization and schema management
//! - Transactional import of scraped records with title de-duplication
//! - Shared person records across director, writer and star roles
//! - Paginated listing and multi-criteria search

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{MovieStore, StorageError, StorageResult};

use serde::Serialize;
use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(StorageError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::new(path)
}

/// A movie as stored, with its credits in billing order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredMovie {
    pub id: i64,
    pub title: String,
    pub release_year: Option<String>,
    pub rating: Option<f64>,
    pub plot: String,
    pub directors: Vec<String>,
    pub writers: Vec<String>,
    pub stars: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// One page of a larger result set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,

    /// Number of matches across all pages
    pub total: u64,

    /// 1-based page number
    pub page: u32,

    pub page_size: u32,
}

impl<T> Page<T> {
    /// Number of pages needed to hold `total` items
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size))
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }
}

/// Outcome of importing a batch of scraped records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Movies newly inserted
    pub added: usize,

    /// Records offered for import
    pub total_scraped: usize,

    /// Titles that were already stored, in import order
    pub duplicates: Vec<String>,
}

/// Search criteria; unset fields match everything and set fields are ANDed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieFilter {
    /// Case-insensitive substring of the title
    pub title: Option<String>,

    /// Exact release year
    pub year: Option<String>,

    /// Case-insensitive substring of any director, writer or star name
    pub person: Option<String>,

    /// Inclusive lower bound on the rating; unrated movies never match
    pub min_rating: Option<f64>,
}

impl MovieFilter {
    /// True when no criterion is set
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.year.is_none()
            && self.person.is_none()
            && self.min_rating.is_none()
    }
}
