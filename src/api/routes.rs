// -- Route Handlers --

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::dataset::{League, PlayerRecord};
use crate::monitoring::health::HealthReport;
use crate::proxy::PredictionEndpoint;
use crate::search::{search_nba, search_nfl};

pub const LIVENESS_MESSAGE: &str = "Fantasy Predictor API is running";

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse<T> {
    pub data: Vec<T>,
}

/// A query string that fails to deserialize searches for nothing.
fn query_or_empty(params: Result<Query<SearchParams>, QueryRejection>) -> String {
    match params {
        Ok(Query(params)) => params.name.unwrap_or_default(),
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "Unreadable search query, treating as empty");
            String::new()
        }
    }
}

pub async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.health.report())
}

pub async fn nba_players(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Json<SearchResponse<PlayerRecord>> {
    let query = query_or_empty(params);
    let data = search_nba(&query, state.datasets.get(League::Nba));
    debug!(query = %query, results = data.len(), "NBA player search");
    Json(SearchResponse { data })
}

pub async fn nfl_players(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Json<SearchResponse<String>> {
    let query = query_or_empty(params);
    let data = search_nfl(&query, state.datasets.get(League::Nfl));
    debug!(query = %query, results = data.len(), "NFL player search");
    Json(SearchResponse { data })
}

pub async fn predict_nba(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    forward(&state, PredictionEndpoint::Nba, &body).await
}

pub async fn predict_nfl(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    forward(&state, PredictionEndpoint::Nfl, &body).await
}

async fn forward(
    state: &AppState,
    endpoint: PredictionEndpoint,
    body: &Value,
) -> Result<Response, ApiError> {
    let forwarded = state.predictor.forward(endpoint, body).await?;
    Ok((forwarded.status, Json(forwarded.body)).into_response())
}

pub async fn api_not_found() -> ApiError {
    ApiError::NotFound
}
