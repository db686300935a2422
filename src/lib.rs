pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod scraping;
pub mod utils;

use std::path::Path;

use anyhow::Result;
use tracing::info;

use config::ScrapeConfig;
use fetch::CachedFetcher;

pub use error::ScrapeError;
pub use models::{Flag, PerformanceRecord, ShowRecord};

/// Scrapes every show in the configured url list and writes the JSON once all succeed.
pub fn run(config: &ScrapeConfig, output: Option<&Path>) -> Result<()> {
    let urls = utils::load_url_list(&config.urls_file)?;
    info!(count = urls.len(), file = ?config.urls_file, "loaded show urls");

    let fetcher = CachedFetcher::new(config)?;
    let shows = scraping::run_all(&urls, &fetcher)?;

    utils::write_json(&shows, output)?;
    if let Some(path) = output {
        info!(shows = shows.len(), path = ?path, "wrote shows");
    }
    Ok(())
}
