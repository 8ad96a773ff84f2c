//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::model::MovieRecord;
use crate::storage::{ImportSummary, MovieFilter, Page, StoredMovie};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid page request: page {page}, page size {page_size}")]
    InvalidPage { page: u32, page_size: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for movie catalogue backends
pub trait MovieStore {
    /// Stores a batch of scraped records atomically
    ///
    /// A record whose title is already stored counts as a duplicate: the
    /// existing row is kept as is, but any credits it lacks are still linked.
    /// Either every record is applied or none is.
    fn import_records(&mut self, records: &[MovieRecord]) -> StorageResult<ImportSummary>;

    /// Lists stored movies, newest release first, then by title
    ///
    /// # Arguments
    ///
    /// * `page` - 1-based page number
    /// * `page_size` - Number of movies per page
    fn list_movies(&self, page: u32, page_size: u32) -> StorageResult<Page<StoredMovie>>;

    /// Lists stored movies matching every criterion set in `filter`
    fn search_movies(
        &self,
        filter: &MovieFilter,
        page: u32,
        page_size: u32,
    ) -> StorageResult<Page<StoredMovie>>;

    /// Total number of stored movies
    fn count_movies(&self) -> StorageResult<u64>;
}
