//! Output module for presenting scrape results and stored movies
//!
//! This module handles:
//! - Human-readable import summaries after a scrape
//! - Tabular listings of stored movies
//! - JSON export of records and result pages

mod json;
mod summary;
mod table;

pub use json::{page_to_json, records_to_json};
pub use summary::{format_import_summary, print_import_summary};
pub use table::{format_movie_page, print_movie_page};
