//! JSON export

use crate::model::MovieRecord;
use crate::storage::{Page, StoredMovie};

/// Serializes scraped records as a pretty-printed JSON array
pub fn records_to_json(records: &[MovieRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

/// Serializes a page of stored movies, including its paging metadata
pub fn page_to_json(page: &Page<StoredMovie>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_record_fields() {
        let records = vec![MovieRecord {
            title: "Inception".to_string(),
            release_year: Some("2010".to_string()),
            rating: Some(8.8),
            plot: "A thief who steals corporate secrets".to_string(),
            director: vec!["Christopher Nolan".to_string()],
            writer: vec!["Christopher Nolan".to_string()],
            star: vec!["Leonardo DiCaprio".to_string()],
        }];

        let value: Value = serde_json::from_str(&records_to_json(&records).unwrap()).unwrap();
        let first = &value[0];
        assert_eq!(first["title"], "Inception");
        assert_eq!(first["release_year"], "2010");
        assert_eq!(first["rating"], 8.8);
        assert_eq!(first["star"][0], "Leonardo DiCaprio");
    }

    #[test]
    fn test_missing_rating_is_null() {
        let records = vec![MovieRecord {
            title: "Unrated".to_string(),
            ..MovieRecord::default()
        }];
        let value: Value = serde_json::from_str(&records_to_json(&records).unwrap()).unwrap();
        assert!(value[0]["rating"].is_null());
    }

    #[test]
    fn test_page_metadata() {
        let page: Page<StoredMovie> = Page {
            items: vec![],
            total: 0,
            page: 3,
            page_size: 25,
        };
        let value: Value = serde_json::from_str(&page_to_json(&page).unwrap()).unwrap();
        assert_eq!(value["page"], 3);
        assert_eq!(value["page_size"], 25);
        assert_eq!(value["items"], Value::Array(vec![]));
    }
}
