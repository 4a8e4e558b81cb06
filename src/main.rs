use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use fantasy_predictor::api::{self, AppState};
use fantasy_predictor::config::AppConfig;
use fantasy_predictor::dataset::DatasetStore;
use fantasy_predictor::monitoring::logger;
use fantasy_predictor::proxy::HttpPredictionBackend;

/// Player search and prediction proxy for the fantasy predictor frontend.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "config/default.toml")]
    config: PathBuf,

    /// Override `server.port` (and `PORT`).
    #[arg(long)]
    port: Option<u16>,

    /// Serve a built frontend bundle from this directory.
    #[arg(long)]
    static_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(&cli.config)?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if cli.static_dir.is_some() {
        config.server.static_dir = cli.static_dir;
    }

    logger::init_logging(&config.monitoring)?;

    tracing::info!(
        port = config.server.port,
        prefix = %config.server.api_prefix,
        prediction_url = %config.prediction.base_url,
        "Fantasy predictor starting"
    );

    // Loaded before binding, so no request ever sees a half-loaded store.
    let datasets = DatasetStore::load(&config.datasets).await;
    let predictor = HttpPredictionBackend::new(&config.prediction)
        .context("Failed to build prediction HTTP client")?;

    let state = AppState::new(datasets, Arc::new(predictor));
    api::serve(state, &config.server).await
}
