pub mod base;
pub mod flags;
pub mod performances;
pub mod show_page;

use anyhow::Context;
use tracing::{error, info};

use crate::error::ScrapeError;
use crate::models::ShowRecord;

pub use performances::extract_performances;
pub use show_page::extract_show_fields;

/// Supplies the raw HTML for a show page.
pub trait PageSource {
    fn fetch(&self, url: &str) -> anyhow::Result<String>;
}

/// Builds the record for the show at `index` (0-based) in the url list.
pub fn scrape_show(html: &str, url: &str, index: usize) -> Result<ShowRecord, ScrapeError> {
    let fields = extract_show_fields(html)?;
    let performances = extract_performances(html, fields.runtime_minutes)?;
    Ok(ShowRecord::from_parts(fields, url, index, performances))
}

/// Scrapes every `(line index, url)` pair in order. The first failure stops the run.
pub fn run_all(
    urls: &[(usize, String)],
    source: &dyn PageSource,
) -> anyhow::Result<Vec<ShowRecord>> {
    let mut shows = Vec::with_capacity(urls.len());

    for &(index, ref url) in urls {
        info!(show = index + 1, %url, "scraping show");
        let result = source
            .fetch(url)
            .and_then(|html| scrape_show(&html, url, index).map_err(anyhow::Error::from));
        match result {
            Ok(show) => {
                info!(
                    show = show.id,
                    performances = show.performances.len(),
                    title = %show.title,
                    "scraped show"
                );
                shows.push(show);
            }
            Err(err) => {
                error!(show = index + 1, %url, error = %err, "scrape failed");
                return Err(err).with_context(|| format!("show {} ({url})", index + 1));
            }
        }
    }

    Ok(shows)
}
