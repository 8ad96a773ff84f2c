//! Configuration module for Cinescrape
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! and turning them into the immutable [`ScraperConfig`] shared by every worker.
//!
//! # Example
//!
//! ```no_run
//! use cinescrape::config::{load_config, ScraperConfig};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("cinescrape.toml")).unwrap();
//! let scraper_config = ScraperConfig::from_config(&config).unwrap();
//! println!("Searching {}", scraper_config.base_url);
//! ```

mod parser;
mod runtime;
mod types;
mod validation;

// Re-export types
pub use runtime::ScraperConfig;
pub use types::{
    Config, ListingEngine, OutputConfig, ScraperSettings, SelectorConfig, SourceConfig,
};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};

pub(crate) use validation::validate_selector;
