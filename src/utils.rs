use std::{fs, io::Write, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use dirs::cache_dir;
use serde::Serialize;

pub fn default_cache_dir() -> PathBuf {
    cache_dir()
        .map(|base| base.join("fringe-scrape"))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
        .join("fetch_cache")
}

/// One url per line, paired with its 0-based line index. Blank lines are
/// skipped but still count, so ids match line numbers in the file.
pub fn parse_url_list(contents: &str) -> Vec<(usize, String)> {
    contents
        .lines()
        .map(str::trim)
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(index, line)| (index, line.to_string()))
        .collect()
}

pub fn load_url_list(path: &Path) -> Result<Vec<(usize, String)>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read url list {:?}", path))?;
    Ok(parse_url_list(&contents))
}

pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent {:?}", parent))?;
    }
    Ok(())
}

/// Pretty JSON to `output`, or to stdout when no path is given.
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    match output {
        Some(path) => {
            ensure_parent(path)?;
            fs::write(path, json).with_context(|| format!("failed to write {:?}", path))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("failed to write to stdout")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_list_keeps_line_positions() {
        let urls = parse_url_list("https://a.test/1\n\n  https://a.test/3  \r\n\n");
        assert_eq!(
            urls,
            vec![
                (0, "https://a.test/1".to_string()),
                (2, "https://a.test/3".to_string())
            ]
        );
    }

    #[test]
    fn writes_json_file() {
        let path = std::env::temp_dir()
            .join(format!("fringe-scrape-out-{}", std::process::id()))
            .join("shows.json");
        write_json(&vec![1, 2], Some(&path)).expect("write json");
        let written = fs::read_to_string(&path).expect("read back");
        assert_eq!(
            serde_json::from_str::<Vec<i32>>(&written).expect("valid json"),
            vec![1, 2]
        );
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir_all(parent);
        }
    }
}
