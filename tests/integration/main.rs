//! Integration tests for Cinescrape
//!
//! These tests use wiremock to stand in for the movie site and run the
//! search, fetch, extract and store cycle end-to-end.

mod scrape_tests;
mod storage_tests;
