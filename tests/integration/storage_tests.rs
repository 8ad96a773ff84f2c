//! Scrape-then-store runs against a mock movie site and a file database

use crate::scrape_tests::{create_test_config, mount_inception_site};
use cinescrape::app::{run_scrape_import, ScrapeRequest};
use cinescrape::crawler::build_orchestrator;
use cinescrape::storage::{open_storage, MovieFilter, MovieStore};
use wiremock::MockServer;

#[tokio::test]
async fn test_scrape_import_then_query() {
    let mock_server = MockServer::start().await;
    mount_inception_site(&mock_server).await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("movies.db");
    let mut storage = open_storage(&db_path).unwrap();

    let orchestrator = build_orchestrator(create_test_config(&mock_server.uri())).unwrap();
    let request = ScrapeRequest::parse(Some("Inception"), Some("3"), 10).unwrap();

    let outcome = run_scrape_import(&orchestrator, &mut storage, &request)
        .await
        .unwrap();

    assert_eq!(outcome.succeeded, 2);
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.summary.added, 2);
    assert_eq!(outcome.summary.total_scraped, 2);
    assert!(outcome.summary.duplicates.is_empty());

    let listed = storage.list_movies(1, 10).unwrap();
    let titles: Vec<&str> = listed.items.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Tenet", "Inception"]);

    let by_person = storage
        .search_movies(
            &MovieFilter {
                person: Some("dicaprio".to_string()),
                ..MovieFilter::default()
            },
            1,
            10,
        )
        .unwrap();
    assert_eq!(by_person.total, 1);
    assert_eq!(by_person.items[0].title, "Inception");
    assert_eq!(by_person.items[0].stars[0], "Leonardo DiCaprio");
}

#[tokio::test]
async fn test_second_import_reports_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("movies.db");
    let request = ScrapeRequest::parse(Some("Inception"), Some("1"), 10).unwrap();

    for expected_added in [2, 0] {
        let mock_server = MockServer::start().await;
        mount_inception_site(&mock_server).await;

        let mut storage = open_storage(&db_path).unwrap();
        let orchestrator = build_orchestrator(create_test_config(&mock_server.uri())).unwrap();
        let outcome = run_scrape_import(&orchestrator, &mut storage, &request)
            .await
            .unwrap();

        assert_eq!(outcome.summary.added, expected_added);
        assert_eq!(outcome.summary.duplicates.len(), 2 - expected_added);
    }

    let storage = open_storage(&db_path).unwrap();
    assert_eq!(storage.count_movies().unwrap(), 2);
}
