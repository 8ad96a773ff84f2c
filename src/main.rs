//! Cinescrape main entry point
//!
//! This is the command-line interface for the Cinescrape movie harvester.

use anyhow::Context;
use cinescrape::app::{run_scrape, run_scrape_import, ScrapeRequest};
use cinescrape::config::{load_config_or_default, Config, ScraperConfig};
use cinescrape::crawler::build_orchestrator;
use cinescrape::output::{
    page_to_json, print_import_summary, print_movie_page, records_to_json,
};
use cinescrape::storage::{open_storage, MovieFilter, MovieStore, Page, StoredMovie};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Cinescrape: a movie-metadata harvester
///
/// Cinescrape searches IMDb for a title, follows every result to its detail
/// page, extracts the movie's metadata and stores it in a local SQLite
/// catalogue that can then be listed and searched.
#[derive(Parser, Debug)]
#[command(name = "cinescrape")]
#[command(version = "1.0.0")]
#[command(about = "A movie-metadata harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search, scrape every result and store the movies
    Scrape {
        /// Free-text title query
        #[arg(long)]
        query: Option<String>,

        /// Number of listing pages to load (1 to the configured limit)
        #[arg(long)]
        max_pages: Option<String>,

        /// Print the scraped records as JSON instead of storing them
        #[arg(long)]
        dry_run: bool,
    },

    /// List stored movies, newest first
    List(PageArgs),

    /// Search stored movies
    Search {
        /// Case-insensitive substring of the title
        #[arg(long)]
        title: Option<String>,

        /// Exact release year
        #[arg(long)]
        year: Option<String>,

        /// Case-insensitive substring of a director, writer or star
        #[arg(long)]
        person: Option<String>,

        /// Minimum rating (inclusive)
        #[arg(long)]
        min_rating: Option<f64>,

        #[command(flatten)]
        paging: PageArgs,
    },
}

#[derive(Args, Debug)]
struct PageArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Movies per page (configured default when omitted)
    #[arg(long)]
    page_size: Option<u32>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let config = load_config_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    match cli.command {
        Command::Scrape {
            query,
            max_pages,
            dry_run,
        } => handle_scrape(&config, query.as_deref(), max_pages.as_deref(), dry_run).await,
        Command::List(paging) => handle_list(&config, &paging),
        Command::Search {
            title,
            year,
            person,
            min_rating,
            paging,
        } => {
            let filter = MovieFilter {
                title,
                year,
                person,
                min_rating,
            };
            handle_search(&config, &filter, &paging)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("cinescrape=info,warn"),
            1 => EnvFilter::new("cinescrape=debug,info"),
            2 => EnvFilter::new("cinescrape=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles `scrape`: validates the request, scrapes, then stores or prints
async fn handle_scrape(
    config: &Config,
    query: Option<&str>,
    max_pages: Option<&str>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let request = ScrapeRequest::parse(query, max_pages, config.scraper.max_pages_limit)?;

    let scraper_config = Arc::new(ScraperConfig::from_config(config)?);
    let orchestrator = build_orchestrator(scraper_config)?;

    if dry_run {
        let report = run_scrape(&orchestrator, &request).await?;
        tracing::info!(
            "Dry run: {} records, {} failed pages, nothing stored",
            report.succeeded,
            report.failed
        );
        println!("{}", records_to_json(&report.records)?);
        return Ok(());
    }

    let mut storage = open_storage(Path::new(&config.output.database_path))
        .with_context(|| format!("Failed to open {}", config.output.database_path))?;

    match run_scrape_import(&orchestrator, &mut storage, &request).await {
        Ok(outcome) => {
            print_import_summary(&outcome);
            Ok(())
        }
        Err(e) => {
            tracing::error!("An error occurred during import: {}", e);
            Err(e.into())
        }
    }
}

/// Handles `list`
fn handle_list(config: &Config, paging: &PageArgs) -> anyhow::Result<()> {
    let storage = open_storage(Path::new(&config.output.database_path))?;
    let page = storage.list_movies(paging.page, page_size(config, paging))?;
    show_page(&page, paging.json)
}

/// Handles `search`
fn handle_search(config: &Config, filter: &MovieFilter, paging: &PageArgs) -> anyhow::Result<()> {
    let storage = open_storage(Path::new(&config.output.database_path))?;
    let page = storage.search_movies(filter, paging.page, page_size(config, paging))?;
    show_page(&page, paging.json)
}

fn page_size(config: &Config, paging: &PageArgs) -> u32 {
    paging.page_size.unwrap_or(config.output.page_size)
}

fn show_page(page: &Page<StoredMovie>, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", page_to_json(page)?);
    } else {
        print_movie_page(page);
    }
    Ok(())
}
