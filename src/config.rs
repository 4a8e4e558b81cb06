use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub datasets: DatasetConfig,
    pub prediction: PredictionConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub api_prefix: String,
    /// Directory holding a built frontend bundle. When set, unknown non-API
    /// paths fall back to its `index.html`.
    #[serde(default)]
    pub static_dir: Option<String>,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins. A single `"*"` allows any origin.
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    pub nba_path: String,
    pub nfl_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictionConfig {
    pub base_url: String,
    pub nba_path: String,
    pub nfl_path: String,
    /// Outbound request timeout. Unset means the proxy waits indefinitely.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: String,
    #[serde(default = "default_json_logs")]
    pub json_logs: bool,
}

fn default_json_logs() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from a TOML file, overlaying deployment values from the environment.
    pub fn load(config_path: &Path) -> Result<Self> {
        dotenvy::dotenv().ok();

        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Overlay `PREDICTION_API_URL` and `PORT`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("PREDICTION_API_URL") {
            self.prediction.base_url = url;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {port}"))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let prefix = &self.server.api_prefix;
        if !prefix.starts_with('/') || prefix == "/" || prefix.ends_with('/') {
            bail!("server.api_prefix must look like \"/api\", got {prefix:?}");
        }
        if self.server.cors.allowed_origins.is_empty() {
            bail!("server.cors.allowed_origins must list at least one origin (or \"*\")");
        }
        if !self.prediction.base_url.starts_with("http://")
            && !self.prediction.base_url.starts_with("https://")
        {
            bail!(
                "prediction.base_url must be an http(s) URL, got {:?}",
                self.prediction.base_url
            );
        }
        Ok(())
    }
}
