use serde::Deserialize;

/// Main configuration structure for Cinescrape
///
/// Every section is optional; missing keys fall back to the values that
/// match the live IMDb markup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub scraper: ScraperSettings,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where and as whom to scrape
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Site root; relative result links are resolved against it
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Path of the search-results listing
    #[serde(rename = "search-path", default = "default_search_path")]
    pub search_path: String,

    /// Browser identity presented to the source
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Concurrency and timing knobs
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperSettings {
    /// Size of the detail-page worker pool
    #[serde(rename = "max-workers", default = "default_max_workers")]
    pub max_workers: u32,

    /// How long to wait for the "load more" control before giving up (milliseconds)
    #[serde(rename = "load-more-timeout-ms", default = "default_load_more_timeout_ms")]
    pub load_more_timeout_ms: u64,

    /// Per-request deadline for detail page fetches (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Largest page budget the command layer accepts
    #[serde(rename = "max-pages-limit", default = "default_max_pages_limit")]
    pub max_pages_limit: u32,

    /// How the search listing is loaded
    #[serde(rename = "listing-engine", default)]
    pub listing_engine: ListingEngine,
}

/// Engine used to render the search listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingEngine {
    /// Headless Chromium; supports "load more" pagination
    #[default]
    Chromium,

    /// Plain HTTP GET; first listing page only
    Http,
}

/// CSS selectors for every field the crawler extracts
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    #[serde(rename = "load-more", default = "default_load_more")]
    pub load_more: String,

    #[serde(rename = "movie-list", default = "default_movie_list")]
    pub movie_list: String,

    #[serde(rename = "movie-link", default = "default_movie_link")]
    pub movie_link: String,

    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_plot")]
    pub plot: String,

    #[serde(default = "default_credits")]
    pub credits: String,

    #[serde(default = "default_rating")]
    pub rating: String,

    #[serde(rename = "release-date", default = "default_release_date")]
    pub release_date: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,

    /// Default page size for `list` and `search`
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            search_path: default_search_path(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            load_more_timeout_ms: default_load_more_timeout_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            max_pages_limit: default_max_pages_limit(),
            listing_engine: ListingEngine::default(),
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            load_more: default_load_more(),
            movie_list: default_movie_list(),
            movie_link: default_movie_link(),
            title: default_title(),
            plot: default_plot(),
            credits: default_credits(),
            rating: default_rating(),
            release_date: default_release_date(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            page_size: default_page_size(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.imdb.com".to_string()
}

fn default_search_path() -> String {
    "/search/title/".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/112.0.0.0 Safari/537.36"
        .to_string()
}

fn default_max_workers() -> u32 {
    5
}

fn default_load_more_timeout_ms() -> u64 {
    5000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_pages_limit() -> u32 {
    10
}

fn default_load_more() -> String {
    ".ipc-see-more__button".to_string()
}

fn default_movie_list() -> String {
    "ul.ipc-metadata-list".to_string()
}

fn default_movie_link() -> String {
    "a.ipc-title-link-wrapper".to_string()
}

fn default_title() -> String {
    "span[data-testid='hero__primary-text']".to_string()
}

fn default_plot() -> String {
    "p[data-testid='plot'] span".to_string()
}

fn default_credits() -> String {
    "li[data-testid='title-pc-principal-credit']".to_string()
}

fn default_rating() -> String {
    "div[data-testid='hero-rating-bar__aggregate-rating__score'] span".to_string()
}

fn default_release_date() -> String {
    "h1[data-testid='hero__pageTitle']".to_string()
}

fn default_database_path() -> String {
    "./cinescrape.db".to_string()
}

fn default_page_size() -> u32 {
    10
}
