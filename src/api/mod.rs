//! HTTP server: player search, prediction proxy, health, and the optional
//! frontend bundle.

pub mod error;
pub mod routes;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{CorsConfig, ServerConfig};
use crate::dataset::DatasetStore;
use crate::monitoring::health::HealthState;
use crate::proxy::PredictionBackend;

/// Shared state accessible by all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub datasets: Arc<DatasetStore>,
    pub predictor: Arc<dyn PredictionBackend>,
    pub health: Arc<HealthState>,
}

impl AppState {
    pub fn new(datasets: DatasetStore, predictor: Arc<dyn PredictionBackend>) -> Self {
        let health = HealthState::new(&datasets);
        Self {
            datasets: Arc::new(datasets),
            predictor,
            health: Arc::new(health),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState, config: &ServerConfig) -> Result<Router> {
    let api = Router::new()
        .route("/players", get(routes::nba_players))
        .route("/players/nfl", get(routes::nfl_players))
        .route("/predict", post(routes::predict_nba))
        .route("/predict_nfl", post(routes::predict_nfl))
        .route("/health", get(routes::health))
        .fallback(routes::api_not_found);

    let app = Router::new().nest(&config.api_prefix, api);

    let app = match &config.static_dir {
        Some(dir) => {
            let index = Path::new(dir).join("index.html");
            info!(dir = %dir, "Serving frontend bundle");
            app.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
        }
        None => app.route("/", get(routes::liveness)),
    };

    Ok(app
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(cors_layer(&config.cors)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// CORS policy: any origin for `"*"`, otherwise the listed origins only.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if config.allows_any() {
        return Ok(layer.allow_origin(Any));
    }

    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            // Browsers send the Origin header without a trailing slash.
            let origin = origin.trim_end_matches('/');
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid CORS origin: {origin:?}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}

/// Bind and serve until Ctrl-C.
pub async fn serve(state: AppState, config: &ServerConfig) -> Result<()> {
    let app = router(state, config)?;
    let addr = format!("{}:{}", config.bind, config.port);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(addr = %addr, prefix = %config.api_prefix, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
