use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::ScrapeConfig;
use crate::scraping::PageSource;

/// Read-through page cache: one file per url under `cache_dir`, falling back to HTTP.
pub struct CachedFetcher {
    client: Client,
    cache_dir: PathBuf,
    read_cache: bool,
}

impl CachedFetcher {
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .context("failed to build http client")?;
        fs::create_dir_all(&config.cache_dir).with_context(|| {
            format!("failed to create cache directory {:?}", config.cache_dir)
        })?;
        Ok(Self {
            client,
            cache_dir: config.cache_dir.clone(),
            read_cache: !config.no_cache,
        })
    }

    pub fn cache_path(&self, url: &str) -> PathBuf {
        self.cache_dir.join(cache_key(url))
    }

    fn fetch_remote(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("request failed for {url}"))?;
        let response = response
            .error_for_status()
            .with_context(|| format!("non-success status for {url}"))?;
        response
            .text()
            .with_context(|| format!("unable to read response body for {url}"))
    }
}

impl PageSource for CachedFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let path = self.cache_path(url);
        if self.read_cache && path.is_file() {
            debug!(%url, path = ?path, "using cache");
            return fs::read_to_string(&path)
                .with_context(|| format!("failed to read cache file {:?}", path));
        }

        debug!(%url, "fetching page");
        let html = self.fetch_remote(url)?;
        fs::write(&path, &html).with_context(|| format!("failed to write cache file {:?}", path))?;
        Ok(html)
    }
}

pub fn cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    format!("{:x}", hasher.finalize())
}
