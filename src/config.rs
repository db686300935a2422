use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::utils;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScrapeConfig {
    pub urls_file: PathBuf,
    pub cache_dir: PathBuf,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Ignore cached pages (fresh fetches are still written back).
    pub no_cache: bool,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            urls_file: PathBuf::from("play_urls.txt"),
            cache_dir: utils::default_cache_dir(),
            user_agent: "FringeScrape/0.1".to_string(),
            timeout_secs: 20,
            no_cache: false,
        }
    }
}

impl ScrapeConfig {
    /// Reads a JSON config file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {:?}", path))?;
        serde_json::from_str(&contents).with_context(|| format!("invalid config {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: ScrapeConfig =
            serde_json::from_str(r#"{ "urls_file": "shows.txt", "timeout_secs": 5 }"#)
                .expect("parse config");
        assert_eq!(config.urls_file, PathBuf::from("shows.txt"));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.cache_dir, ScrapeConfig::default().cache_dir);
        assert!(!config.no_cache);
    }
}
