//! HTML extraction for detail pages and search listings
//!
//! Every extractor is a pure function of a parsed document and a compiled
//! selector. Missing markup is never an error: it yields `None` or an empty
//! value so that one broken field cannot sink the rest of the record.

use crate::config::{validate_selector, SelectorConfig};
use crate::model::MovieRecord;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Compiled selectors for every field the crawler reads
#[derive(Debug, Clone)]
pub struct Selectors {
    /// Raw CSS for the "load more" control; handed to the browser, not to `scraper`
    pub load_more: String,

    /// Raw CSS for result links, counted in the browser while the listing grows
    pub result_link: String,

    pub movie_list: Selector,
    pub movie_link: Selector,
    pub title: Selector,
    pub plot: Selector,
    pub credits: Selector,
    pub rating: Selector,
    pub release_date: Selector,

    // Fixed structure inside the configurable blocks
    credit_label: Selector,
    credit_label_link: Selector,
    credit_names: Selector,
    anchor: Selector,
    release_link: Selector,
}

impl Selectors {
    /// Compiles the configured selectors
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        validate_selector("load-more", &config.load_more)?;

        Ok(Self {
            load_more: config.load_more.clone(),
            result_link: config.movie_link.clone(),
            movie_list: validate_selector("movie-list", &config.movie_list)?,
            movie_link: validate_selector("movie-link", &config.movie_link)?,
            title: validate_selector("title", &config.title)?,
            plot: validate_selector("plot", &config.plot)?,
            credits: validate_selector("credits", &config.credits)?,
            rating: validate_selector("rating", &config.rating)?,
            release_date: validate_selector("release-date", &config.release_date)?,
            credit_label: validate_selector("credit-label", "span")?,
            credit_label_link: validate_selector(
                "credit-label",
                "a.ipc-metadata-list-item__label",
            )?,
            credit_names: validate_selector("credit-names", "ul.ipc-inline-list")?,
            anchor: validate_selector("anchor", "a")?,
            release_link: validate_selector("release-link", "ul li a")?,
        })
    }
}

/// Credited people grouped by role, each in billing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credits {
    pub director: Vec<String>,
    pub writer: Vec<String>,
    pub star: Vec<String>,
}

/// The roles we keep from the principal credits block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CreditRole {
    Director,
    Writer,
    Star,
}

impl CreditRole {
    fn from_label(label: &str) -> Option<Self> {
        match label {
            "Director" | "Directors" => Some(Self::Director),
            "Writer" | "Writers" => Some(Self::Writer),
            "Star" | "Stars" => Some(Self::Star),
            _ => None,
        }
    }
}

/// Parses a detail page and assembles a record from whatever fields are present
pub fn parse_movie_page(html: &str, selectors: &Selectors) -> MovieRecord {
    let document = Html::parse_document(html);
    extract_record(&document, selectors)
}

/// Runs every field extractor against an already-parsed document
pub fn extract_record(document: &Html, selectors: &Selectors) -> MovieRecord {
    let credits = extract_credits(document, selectors);

    MovieRecord {
        title: extract_title(document, selectors).unwrap_or_default(),
        release_year: extract_release_year(document, selectors),
        rating: extract_rating(document, selectors),
        plot: extract_plot(document, selectors).unwrap_or_default(),
        director: credits.director,
        writer: credits.writer,
        star: credits.star,
    }
}

/// Extracts the movie title
pub fn extract_title(document: &Html, selectors: &Selectors) -> Option<String> {
    first_text(document, &selectors.title)
}

/// Extracts the plot summary
pub fn extract_plot(document: &Html, selectors: &Selectors) -> Option<String> {
    first_text(document, &selectors.plot)
}

/// Extracts the aggregate rating
///
/// Text that is present but not a finite number is logged and treated as absent.
pub fn extract_rating(document: &Html, selectors: &Selectors) -> Option<f64> {
    let text = first_text(document, &selectors.rating)?;

    match text.parse::<f64>() {
        Ok(rating) if rating.is_finite() => Some(rating),
        Ok(rating) => {
            tracing::warn!("Ignoring non-finite rating '{}' ({})", text, rating);
            None
        }
        Err(e) => {
            tracing::warn!("Failed to convert rating '{}': {}", text, e);
            None
        }
    }
}

/// Extracts the release year
///
/// The year is the first `ul li a` inside the `div` that wraps the page heading.
pub fn extract_release_year(document: &Html, selectors: &Selectors) -> Option<String> {
    let heading = document.select(&selectors.release_date).next()?;

    let container = heading
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "div")?;

    container
        .select(&selectors.release_link)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

/// Extracts directors, writers and stars from the principal credit blocks
///
/// Blocks with an unrecognized label are skipped. A block without a name list
/// leaves its role empty; a later block with the same label replaces an
/// earlier one.
pub fn extract_credits(document: &Html, selectors: &Selectors) -> Credits {
    let mut credits = Credits::default();

    for section in document.select(&selectors.credits) {
        let label = section
            .select(&selectors.credit_label)
            .next()
            .or_else(|| section.select(&selectors.credit_label_link).next())
            .map(element_text);

        let Some(role) = label.as_deref().and_then(CreditRole::from_label) else {
            continue;
        };

        let names = section
            .select(&selectors.credit_names)
            .next()
            .map(|list| {
                list.select(&selectors.anchor)
                    .map(element_text)
                    .filter(|name| !name.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        match role {
            CreditRole::Director => credits.director = names,
            CreditRole::Writer => credits.writer = names,
            CreditRole::Star => credits.star = names,
        }
    }

    credits
}

/// Extracts detail-page links from every results list in a rendered listing
///
/// Relative hrefs are resolved against `base_url`; anything that does not
/// resolve to an http(s) URL is dropped. Document order is preserved.
pub fn extract_movie_links(html: &str, selectors: &Selectors, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    for list in document.select(&selectors.movie_list) {
        for link in list.select(&selectors.movie_link) {
            if let Some(href) = link.value().attr("href") {
                if let Some(url) = resolve_link(href, base_url) {
                    links.push(url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute http(s) URL
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }

    match base_url.join(href) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Some(url),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("Skipping unresolvable link '{}': {}", href, e);
            None
        }
    }
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document.select(selector).next().map(element_text)
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selectors() -> Selectors {
        Selectors::compile(&SelectorConfig::default()).unwrap()
    }

    fn base_url() -> Url {
        Url::parse("https://www.imdb.com").unwrap()
    }

    const INCEPTION: &str = r#"
        <html><body>
        <div class="hero">
            <h1 data-testid="hero__pageTitle"><span data-testid="hero__primary-text">Inception</span></h1>
            <ul class="ipc-inline-list">
                <li><a href="/title/tt1375666/releaseinfo">2010</a></li>
                <li><a href="/title/tt1375666/parentalguide">PG-13</a></li>
            </ul>
        </div>
        <div data-testid="hero-rating-bar__aggregate-rating__score"><span>8.8</span><span>/10</span></div>
        <p data-testid="plot"><span>A thief who steals corporate secrets through dream-sharing technology.</span></p>
        <ul>
            <li data-testid="title-pc-principal-credit">
                <span class="ipc-metadata-list-item__label">Director</span>
                <div><ul class="ipc-inline-list"><li><a href="/name/nm0634240/">Christopher Nolan</a></li></ul></div>
            </li>
            <li data-testid="title-pc-principal-credit">
                <a class="ipc-metadata-list-item__label" href="/title/tt1375666/fullcredits">Writers</a>
                <div><ul class="ipc-inline-list"><li><a href="/name/nm0634240/">Christopher Nolan</a></li></ul></div>
            </li>
            <li data-testid="title-pc-principal-credit">
                <a class="ipc-metadata-list-item__label" href="/title/tt1375666/fullcredits">Stars</a>
                <div><ul class="ipc-inline-list">
                    <li><a href="/name/nm0000138/">Leonardo DiCaprio</a></li>
                    <li><a href="/name/nm0330687/">Joseph Gordon-Levitt</a></li>
                    <li><a href="/name/nm0680983/">Elliot Page</a></li>
                </ul></div>
            </li>
        </ul>
        </body></html>
    "#;

    #[test]
    fn test_full_detail_page() {
        let record = parse_movie_page(INCEPTION, &selectors());

        assert_eq!(record.title, "Inception");
        assert_eq!(record.release_year.as_deref(), Some("2010"));
        assert_eq!(record.rating, Some(8.8));
        assert!(record.plot.starts_with("A thief"));
        assert_eq!(record.director, vec!["Christopher Nolan"]);
        assert_eq!(record.writer, vec!["Christopher Nolan"]);
        assert_eq!(
            record.star,
            vec!["Leonardo DiCaprio", "Joseph Gordon-Levitt", "Elliot Page"]
        );
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let document = Html::parse_document(INCEPTION);
        let selectors = selectors();

        let first = extract_record(&document, &selectors);
        let second = extract_record(&document, &selectors);
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_rating_leaves_other_fields() {
        let html = INCEPTION.replace("hero-rating-bar__aggregate-rating__score", "something-else");
        let record = parse_movie_page(&html, &selectors());

        assert_eq!(record.rating, None);
        assert_eq!(record.title, "Inception");
        assert_eq!(record.release_year.as_deref(), Some("2010"));
        assert_eq!(record.star.len(), 3);
    }

    #[test]
    fn test_non_numeric_rating_is_absent() {
        let html = r#"<div data-testid="hero-rating-bar__aggregate-rating__score"><span>N/A</span></div>"#;
        let document = Html::parse_document(html);
        assert_eq!(extract_rating(&document, &selectors()), None);
    }

    #[test]
    fn test_non_finite_rating_is_absent() {
        for text in ["NaN", "inf", "-infinity"] {
            let html = format!(
                r#"<div data-testid="hero-rating-bar__aggregate-rating__score"><span>{}</span></div>"#,
                text
            );
            let document = Html::parse_document(&html);
            assert_eq!(extract_rating(&document, &selectors()), None, "rating '{}'", text);
        }
    }

    #[test]
    fn test_empty_document() {
        let record = parse_movie_page("<html><body></body></html>", &selectors());
        assert_eq!(record, MovieRecord::default());
    }

    #[test]
    fn test_release_year_without_list() {
        let html = r#"<div><h1 data-testid="hero__pageTitle">Untitled</h1></div>"#;
        let document = Html::parse_document(html);
        assert_eq!(extract_release_year(&document, &selectors()), None);
    }

    #[test]
    fn test_unknown_credit_label_ignored() {
        let html = r#"
            <li data-testid="title-pc-principal-credit">
                <span>Creators</span>
                <ul class="ipc-inline-list"><li><a>Someone</a></li></ul>
            </li>
        "#;
        let document = Html::parse_document(html);
        assert_eq!(extract_credits(&document, &selectors()), Credits::default());
    }

    #[test]
    fn test_credit_block_without_names() {
        let html = r#"
            <li data-testid="title-pc-principal-credit"><span>Director</span></li>
            <li data-testid="title-pc-principal-credit">
                <span>Stars</span><ul class="ipc-inline-list"></ul>
            </li>
        "#;
        let document = Html::parse_document(html);
        let credits = extract_credits(&document, &selectors());
        assert!(credits.director.is_empty());
        assert!(credits.star.is_empty());
    }

    #[test]
    fn test_credit_block_without_label() {
        let html = r#"
            <li data-testid="title-pc-principal-credit">
                <ul class="ipc-inline-list"><li><a>Nobody</a></li></ul>
            </li>
        "#;
        let document = Html::parse_document(html);
        assert_eq!(extract_credits(&document, &selectors()), Credits::default());
    }

    #[test]
    fn test_extract_movie_links() {
        let html = r#"
            <html><body>
            <a class="ipc-title-link-wrapper" href="/title/tt0000009/">Outside the list</a>
            <ul class="ipc-metadata-list">
                <li><a class="ipc-title-link-wrapper" href="/title/tt1375666/?ref_=sr_t_1">Inception</a></li>
                <li><a class="ipc-title-link-wrapper" href="https://www.imdb.com/title/tt0816692/">Interstellar</a></li>
                <li><a class="ipc-title-link-wrapper">No href</a></li>
                <li><a class="other" href="/title/tt0000001/">Wrong class</a></li>
            </ul>
            </body></html>
        "#;
        let links = extract_movie_links(html, &selectors(), &base_url());

        assert_eq!(
            links.iter().map(Url::as_str).collect::<Vec<_>>(),
            vec![
                "https://www.imdb.com/title/tt1375666/?ref_=sr_t_1",
                "https://www.imdb.com/title/tt0816692/",
            ]
        );
    }

    #[test]
    fn test_extract_movie_links_empty_listing() {
        let links = extract_movie_links("<html></html>", &selectors(), &base_url());
        assert!(links.is_empty());
    }

    #[test]
    fn test_resolve_link_skips_javascript() {
        assert_eq!(resolve_link("javascript:void(0)", &base_url()), None);
        assert_eq!(resolve_link("#top", &base_url()), None);
        assert_eq!(resolve_link("mailto:a@b.com", &base_url()), None);
    }
}
