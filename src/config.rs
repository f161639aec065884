//! Pipeline configuration, loadable from a TOML file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

const DEFAULT_ALERTS_URL: &str = "https://api.weather.gov";
const DEFAULT_PHOTON_URL: &str = "https://photon.komoot.io";
const DEFAULT_CONDITIONS_URL: &str = "https://api.weatherapi.com";
const DEFAULT_USER_AGENT: &str = "stormward/0.1 (hazard-advisory pipeline)";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_COMPLETION_LIMIT: usize = 10;

/// Endpoints and tunables for the pipeline's HTTP providers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Base URL of the point-based alerts feed
    pub alerts_url: String,
    /// Base URL of the Photon geocoding service
    pub photon_url: String,
    /// Base URL of the current-conditions service
    pub conditions_url: String,
    /// API key for the current-conditions service; when absent the
    /// conditions fetch is skipped entirely
    pub conditions_api_key: Option<String>,
    /// User agent sent on every request
    pub user_agent: String,
    /// Per-request timeout; also bounds the single-attempt geocode
    pub timeout_secs: u64,
    /// Maximum number of POI completions requested per query
    pub completion_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            alerts_url: DEFAULT_ALERTS_URL.to_string(),
            photon_url: DEFAULT_PHOTON_URL.to_string(),
            conditions_url: DEFAULT_CONDITIONS_URL.to_string(),
            conditions_api_key: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            completion_limit: DEFAULT_COMPLETION_LIMIT,
        }
    }
}

impl PipelineConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PipelineConfig =
            toml::from_str(content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every configured endpoint is an absolute URL
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("alerts_url", &self.alerts_url),
            ("photon_url", &self.photon_url),
            ("conditions_url", &self.conditions_url),
        ] {
            Url::parse(value).with_context(|| format!("Invalid {}: {}", name, value))?;
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
