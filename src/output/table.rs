//! Plain-text tables of stored movies

use crate::storage::{Page, StoredMovie};
use std::fmt::Write;

const TITLE_WIDTH: usize = 40;
const PEOPLE_WIDTH: usize = 30;

/// Renders one page of movies as an aligned table with a page footer
pub fn format_movie_page(page: &Page<StoredMovie>) -> String {
    let mut out = String::new();

    if page.items.is_empty() {
        let _ = writeln!(out, "No movies found.");
    } else {
        let _ = writeln!(
            out,
            "{:<6} {:<title$} {:>6} {:<people$} {:<people$}",
            "YEAR",
            "TITLE",
            "RATING",
            "DIRECTORS",
            "STARS",
            title = TITLE_WIDTH,
            people = PEOPLE_WIDTH
        );

        for movie in &page.items {
            let rating = movie
                .rating
                .map(|r| format!("{:.1}", r))
                .unwrap_or_else(|| "-".to_string());

            let _ = writeln!(
                out,
                "{:<6} {:<title$} {:>6} {:<people$} {:<people$}",
                movie.release_year.as_deref().unwrap_or("-"),
                truncate(&movie.title, TITLE_WIDTH),
                rating,
                truncate(&movie.directors.join(", "), PEOPLE_WIDTH),
                truncate(&movie.stars.join(", "), PEOPLE_WIDTH),
                title = TITLE_WIDTH,
                people = PEOPLE_WIDTH
            );
        }
    }

    let _ = writeln!(
        out,
        "\nPage {} of {} ({} movies)",
        page.page,
        page.total_pages().max(1),
        page.total
    );
    out
}

/// Prints one page of movies to stdout
pub fn print_movie_page(page: &Page<StoredMovie>) {
    print!("{}", format_movie_page(page));
}

/// Shortens `text` to at most `width` characters, marking the cut with "..."
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}
