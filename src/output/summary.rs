//! Import summaries shown after a scrape

use crate::app::ScrapeImport;
use std::fmt::Write;

/// Renders the outcome of a scrape-and-import run
pub fn format_import_summary(outcome: &ScrapeImport) -> String {
    let summary = &outcome.summary;
    let mut out = String::new();

    let _ = writeln!(out, "=== Scrape Summary ===\n");
    let _ = writeln!(out, "Successfully stored {} new movies", summary.added);
    let _ = writeln!(out, "  Pages scraped: {}", outcome.succeeded);
    let _ = writeln!(out, "  Pages failed: {}", outcome.failed);
    let _ = writeln!(out, "  Records imported: {}", summary.total_scraped);

    if !summary.duplicates.is_empty() {
        let _ = writeln!(out, "\nAlready stored ({}):", summary.duplicates.len());
        for title in &summary.duplicates {
            let _ = writeln!(out, "  - {}", title);
        }
    }

    out
}

/// Prints the outcome of a scrape-and-import run to stdout
pub fn print_import_summary(outcome: &ScrapeImport) {
    print!("{}", format_import_summary(outcome));
}
