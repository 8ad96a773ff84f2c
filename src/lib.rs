//! Cinescrape: a movie-metadata harvester
//!
//! This crate searches a movie database website, collects the detail pages
//! matching a query, extracts a normalized record for each movie under a
//! bounded worker pool, and stores the results in SQLite for later querying.

pub mod app;
pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Main error type for Cinescrape operations
#[derive(Debug, Error)]
pub enum CineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector for '{field}': {selector}")]
    InvalidSelector { field: String, selector: String },
}

/// Request validation errors, raised before any network activity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Search query cannot be empty")]
    EmptyQuery,

    #[error("max_pages must be at least 1, got {0}")]
    PageBudgetTooSmall(i64),

    #[error("max_pages must be between 1 and {limit}, got {value}")]
    PageBudgetOutOfRange { value: i64, limit: u32 },

    #[error("Missing required parameters: {0}")]
    MissingParameter(String),

    #[error("max_pages must be a number, got '{0}'")]
    NotANumber(String),
}

/// Result type alias for Cinescrape operations
pub type Result<T> = std::result::Result<T, CineError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, ScraperConfig};
pub use crawler::{Orchestrator, ScrapeReport};
pub use model::{FetchOutcome, MovieRecord, PageBudget, SearchQuery};
