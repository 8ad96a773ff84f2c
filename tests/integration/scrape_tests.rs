//! End-to-end scrapes against a mock movie site

use cinescrape::config::{Config, ListingEngine, ScraperConfig};
use cinescrape::crawler::scrape;
use cinescrape::CineError;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a scraper configuration that lists over plain HTTP from `base_url`
pub fn create_test_config(base_url: &str) -> Arc<ScraperConfig> {
    let mut config = Config::default();
    config.source.base_url = base_url.to_string();
    config.source.user_agent = "TestAgent/1.0".to_string();
    config.scraper.listing_engine = ListingEngine::Http;
    config.scraper.max_workers = 2;
    config.scraper.request_timeout_secs = 5;
    Arc::new(ScraperConfig::from_config(&config).expect("valid test config"))
}

pub fn listing_page(ids: &[&str]) -> String {
    let items: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<li><a class="ipc-title-link-wrapper" href="/title/{}/?ref_=sr_t">{}</a></li>"#,
                id, id
            )
        })
        .collect();
    format!(
        r#"<html><body><ul class="ipc-metadata-list">{}</ul>
        <button class="ipc-see-more__button">50 more</button></body></html>"#,
        items
    )
}

pub fn detail_page(title: &str, year: &str, rating: Option<&str>, stars: &[&str]) -> String {
    let rating = rating
        .map(|r| {
            format!(
                r#"<div data-testid="hero-rating-bar__aggregate-rating__score"><span>{}</span><span>/10</span></div>"#,
                r
            )
        })
        .unwrap_or_default();
    let stars: String = stars
        .iter()
        .map(|s| format!("<li><a>{}</a></li>", s))
        .collect();

    format!(
        r#"<html><body>
        <div>
            <h1 data-testid="hero__pageTitle"><span data-testid="hero__primary-text">{title}</span></h1>
            <ul class="ipc-inline-list"><li><a>{year}</a></li><li><a>PG-13</a></li></ul>
        </div>
        {rating}
        <p data-testid="plot"><span>Plot of {title}.</span></p>
        <ul>
            <li data-testid="title-pc-principal-credit">
                <span class="ipc-metadata-list-item__label">Director</span>
                <ul class="ipc-inline-list"><li><a>Christopher Nolan</a></li></ul>
            </li>
            <li data-testid="title-pc-principal-credit">
                <a class="ipc-metadata-list-item__label">Stars</a>
                <ul class="ipc-inline-list">{stars}</ul>
            </li>
        </ul>
        </body></html>"#
    )
}

/// Mounts a search listing plus three detail pages: one complete, one
/// without a rating and one that errors
pub async fn mount_inception_site(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/search/title/"))
        .and(query_param("title", "Inception"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[
            "tt1375666",
            "tt6723592",
            "tt0000000",
        ])))
        .expect(1)
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/title/tt1375666/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page(
            "Inception",
            "2010",
            Some("8.8"),
            &["Leonardo DiCaprio", "Joseph Gordon-Levitt", "Elliot Page"],
        )))
        .expect(1)
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/title/tt6723592/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page(
            "Tenet",
            "2020",
            None,
            &["John David Washington"],
        )))
        .expect(1)
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/title/tt0000000/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_scrape_collects_and_extracts() {
    let mock_server = MockServer::start().await;
    mount_inception_site(&mock_server).await;

    let config = create_test_config(&mock_server.uri());
    let report = scrape(config, "Inception", 3).await.unwrap();

    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.records.len(), 2);

    let inception = report
        .records
        .iter()
        .find(|r| r.title == "Inception")
        .expect("Inception scraped");
    assert_eq!(inception.release_year.as_deref(), Some("2010"));
    assert_eq!(inception.rating, Some(8.8));
    assert_eq!(inception.director, vec!["Christopher Nolan"]);
    assert_eq!(
        inception.star,
        vec!["Leonardo DiCaprio", "Joseph Gordon-Levitt", "Elliot Page"]
    );

    let tenet = report
        .records
        .iter()
        .find(|r| r.title == "Tenet")
        .expect("Tenet scraped");
    assert_eq!(tenet.rating, None);
    assert_eq!(tenet.release_year.as_deref(), Some("2020"));
    assert_eq!(tenet.plot, "Plot of Tenet.");
}

#[tokio::test]
async fn test_invalid_request_makes_no_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());

    assert!(matches!(
        scrape(config.clone(), "   ", 1).await,
        Err(CineError::Validation(_))
    ));
    assert!(matches!(
        scrape(config, "Inception", 0).await,
        Err(CineError::Validation(_))
    ));
}

#[tokio::test]
async fn test_failed_listing_yields_empty_report() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/title/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/title/tt1375666/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let report = scrape(config, "Inception", 1).await.unwrap();

    assert!(report.records.is_empty());
    assert_eq!(report.attempted(), 0);
}

#[tokio::test]
async fn test_empty_listing_yields_empty_report() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/title/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[])))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let report = scrape(config, "zzqqxx", 5).await.unwrap();

    assert_eq!(report.attempted(), 0);
}
