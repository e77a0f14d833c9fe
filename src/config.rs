//! Fetch-layer configuration loaded from an optional YAML file.
//!
//! CLI flags take precedence over values read here; see [`crate::cli::Cli::fetch_config`].
//!
//! ```yaml
//! user_agent: "Mozilla/5.0 ..."
//! accept_language: "ja-JP,ja;q=0.9,en;q=0.8"
//! timeout_secs: 20
//! max_retries: 3
//! proxy: "socks5://127.0.0.1:1080"
//! ```

use serde::Deserialize;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Settings for [`crate::fetch::HttpSource`] and [`crate::fetch::RetryFetch`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Fixed user agent. A random desktop browser agent is used when unset.
    pub user_agent: Option<String>,
    pub accept_language: String,
    pub timeout_secs: u64,
    pub max_retries: usize,
    /// Base backoff delay in milliseconds.
    pub retry_base_ms: u64,
    pub proxy: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            accept_language: "ja-JP,ja;q=0.9,zh-CN;q=0.8,en;q=0.7".to_string(),
            timeout_secs: 30,
            max_retries: 2,
            retry_base_ms: 500,
            proxy: None,
        }
    }
}

/// Read and parse a YAML config file.
#[instrument(level = "info", skip_all, fields(%path))]
pub async fn load_config(path: &str) -> Result<FetchConfig, Box<dyn Error>> {
    let raw = fs::read_to_string(path).await?;
    let config = parse_config(&raw)?;
    info!(?config, "Loaded fetch configuration");
    Ok(config)
}

pub fn parse_config(raw: &str) -> Result<FetchConfig, serde_yaml::Error> {
    if raw.trim().is_empty() {
        return Ok(FetchConfig::default());
    }
    serde_yaml::from_str(raw)
}
