use crate::config::types::Config;
use crate::config::validation::validate;
use crate::{ConfigError, ConfigResult};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use cinescrape::config::load_config;
///
/// let config = load_config(Path::new("cinescrape.toml")).unwrap();
/// println!("Workers: {}", config.scraper.max_workers);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Loads the configuration at `path`, or the built-in defaults when no path is given
pub fn load_config_or_default(path: Option<&Path>) -> ConfigResult<Config> {
    match path {
        Some(path) => load_config(path),
        None => {
            let config = Config::default();
            validate(&config)?;
            Ok(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[source]
base-url = "https://www.imdb.com"
search-path = "/search/title/"
user-agent = "TestAgent/1.0"

[scraper]
max-workers = 10
load-more-timeout-ms = 2000

[output]
database-path = "./test.db"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.scraper.max_workers, 10);
        assert_eq!(config.scraper.load_more_timeout_ms, 2000);
        assert_eq!(config.scraper.request_timeout_secs, 30);
        assert_eq!(config.source.user_agent, "TestAgent/1.0");
        assert_eq!(config.output.database_path, "./test.db");
        assert_eq!(config.output.page_size, 10);
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.source.base_url, "https://www.imdb.com");
        assert_eq!(config.selectors.load_more, ".ipc-see-more__button");
        assert_eq!(config.scraper.max_workers, 5);
    }

    #[test]
    fn test_selector_override() {
        let config = parse_config(
            r#"
[selectors]
title = "h1.title"
"#,
        )
        .unwrap();

        assert_eq!(config.selectors.title, "h1.title");
        assert_eq!(config.selectors.plot, "p[data-testid='plot'] span");
    }

    #[test]
    fn test_listing_engine() {
        let config = parse_config("[scraper]\nlisting-engine = \"http\"\n").unwrap();
        assert_eq!(config.scraper.listing_engine, crate::config::ListingEngine::Http);

        assert!(matches!(
            parse_config("[scraper]\nlisting-engine = \"firefox\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/cinescrape.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config(
            r#"
[scraper]
max-workers = 0
"#,
        );
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_no_path_uses_defaults() {
        let config = load_config_or_default(None).unwrap();
        assert_eq!(config.scraper.max_pages_limit, 10);
    }
}
