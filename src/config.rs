//! Optional config file loading. Search order: ./chartscrape.toml, then
//! $XDG_CONFIG_HOME/chartscrape/config.toml (or ~/.config/chartscrape/config.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file contents. All fields optional; only present keys override defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct Config {
    /// Site root used for chart and listing URLs (e.g. "https://www.billboard.com").
    pub base_url: Option<String>,
    /// HTTP User-Agent header.
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Number of HTTP attempts for transient failures.
    pub retry_count: Option<u32>,
    /// Delay in seconds before each retry (e.g. [1, 2, 4]).
    pub retry_backoff_secs: Option<Vec<u64>>,
}

/// Candidate config paths in search order.
fn config_paths() -> Result<Vec<PathBuf>, String> {
    let cwd = std::env::current_dir()
        .map_err(|e| format!("Cannot determine current directory: {}", e))?;
    let mut paths = vec![cwd.join("chartscrape.toml")];
    if let Some(d) = dirs::config_dir() {
        paths.push(d.join("chartscrape").join("config.toml"));
    }
    Ok(paths)
}

/// Read and parse one config file.
pub fn load_config_from(path: &Path) -> Result<Config, String> {
    let s = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
    toml::from_str(&s).map_err(|e| format!("Invalid config {}: {}", path.display(), e))
}

/// Load the first config file that exists, for applications embedding the crate.
///
/// Missing file returns Ok(None). Invalid TOML or I/O error reading a present file returns Err.
/// Pass the result to `HttpFetcher::from_config` and `ChartScraper::from_config`.
pub fn load_config() -> Result<Option<Config>, String> {
    load_first_config(&config_paths()?)
}

/// First existing path wins; later candidates are not read.
fn load_first_config(paths: &[PathBuf]) -> Result<Option<Config>, String> {
    for path in paths {
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading config");
            return load_config_from(path).map(Some);
        }
    }
    Ok(None)
}
