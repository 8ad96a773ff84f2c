use crate::config::types::{Config, OutputConfig, ScraperSettings, SelectorConfig, SourceConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_scraper_settings(&config.scraper)?;
    validate_selectors(&config.selectors)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the source site configuration
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if !config.search_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "search-path must start with '/', got '{}'",
            config.search_path
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates worker pool and timing settings
fn validate_scraper_settings(config: &ScraperSettings) -> Result<(), ConfigError> {
    if config.max_workers < 1 || config.max_workers > 64 {
        return Err(ConfigError::Validation(format!(
            "max-workers must be between 1 and 64, got {}",
            config.max_workers
        )));
    }

    if config.load_more_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "load-more-timeout-ms must be >= 100ms, got {}ms",
            config.load_more_timeout_ms
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.max_pages_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages-limit must be >= 1, got {}",
            config.max_pages_limit
        )));
    }

    Ok(())
}

/// Checks that every configured selector compiles
fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    let selectors = [
        ("load-more", &config.load_more),
        ("movie-list", &config.movie_list),
        ("movie-link", &config.movie_link),
        ("title", &config.title),
        ("plot", &config.plot),
        ("credits", &config.credits),
        ("rating", &config.rating),
        ("release-date", &config.release_date),
    ];

    for (field, selector) in selectors {
        validate_selector(field, selector)?;
    }

    Ok(())
}

/// Validates a single CSS selector
pub(crate) fn validate_selector(field: &str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|_| ConfigError::InvalidSelector {
        field: field.to_string(),
        selector: selector.to_string(),
    })
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    if config.page_size < 1 || config.page_size > 100 {
        return Err(ConfigError::Validation(format!(
            "page-size must be between 1 and 100, got {}",
            config.page_size
        )));
    }

    Ok(())
}
