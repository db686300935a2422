use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use fringe_scrape_lib::config::ScrapeConfig;

#[derive(Parser)]
#[command(name = "fringe-scrape")]
#[command(about = "Scrape festival show pages into JSON")]
struct Cli {
    /// Write JSON here instead of stdout
    output: Option<PathBuf>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// File with one show url per line
    #[arg(long)]
    urls: Option<PathBuf>,

    /// Directory for cached pages
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Fetch every page even if it is cached
    #[arg(long)]
    no_cache: bool,
}

impl Cli {
    fn into_config(self) -> Result<(ScrapeConfig, Option<PathBuf>)> {
        let mut config = match &self.config {
            Some(path) => ScrapeConfig::load(path)?,
            None => ScrapeConfig::default(),
        };
        if let Some(urls) = self.urls {
            config.urls_file = urls;
        }
        if let Some(dir) = self.cache_dir {
            config.cache_dir = dir;
        }
        if let Some(secs) = self.timeout {
            config.timeout_secs = secs;
        }
        config.no_cache |= self.no_cache;
        Ok((config, self.output))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fringe_scrape_lib=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let (config, output) = Cli::parse().into_config()?;
    fringe_scrape_lib::run(&config, output.as_deref())
}
