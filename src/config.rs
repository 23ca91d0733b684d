use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Connection settings for the validation backend
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Base URL of the validation API, e.g. `https://validator.example.com`
    pub validation_api_url: String,
    /// Upper bound for a single request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Config {
    pub fn new(validation_api_url: impl Into<String>) -> Self {
        Self {
            validation_api_url: validation_api_url.into(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolve an endpoint path such as `api/submissions/evaluate` against the base URL
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.validation_api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
