//! Prediction service proxy.
//!
//! Forwards prediction requests to the external inference service and
//! hands back whatever status and JSON body it answers with.

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::PredictionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionEndpoint {
    Nba,
    Nfl,
}

impl fmt::Display for PredictionEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionEndpoint::Nba => write!(f, "nba"),
            PredictionEndpoint::Nfl => write!(f, "nfl"),
        }
    }
}

/// Upstream response, relayed as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Forwarded {
    pub status: StatusCode,
    pub body: Value,
}

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("prediction service unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),
    #[error("prediction service returned a non-JSON body (status {status}): {source}")]
    InvalidBody {
        status: StatusCode,
        #[source]
        source: reqwest::Error,
    },
}

/// Anything that can answer a prediction request.
#[async_trait]
pub trait PredictionBackend: Send + Sync {
    async fn forward(
        &self,
        endpoint: PredictionEndpoint,
        body: &Value,
    ) -> Result<Forwarded, ProxyError>;
}

/// Forwards over HTTP to the configured inference service.
pub struct HttpPredictionBackend {
    client: reqwest::Client,
    base_url: String,
    nba_path: String,
    nfl_path: String,
}

impl HttpPredictionBackend {
    pub fn new(config: &PredictionConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            nba_path: config.nba_path.clone(),
            nfl_path: config.nfl_path.clone(),
        })
    }

    pub fn url_for(&self, endpoint: PredictionEndpoint) -> String {
        let path = match endpoint {
            PredictionEndpoint::Nba => &self.nba_path,
            PredictionEndpoint::Nfl => &self.nfl_path,
        };
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait]
impl PredictionBackend for HttpPredictionBackend {
    #[instrument(skip(self, body), fields(request_id = %Uuid::new_v4()))]
    async fn forward(
        &self,
        endpoint: PredictionEndpoint,
        body: &Value,
    ) -> Result<Forwarded, ProxyError> {
        let url = self.url_for(endpoint);
        let started = Instant::now();

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(ProxyError::Unreachable)?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|source| {
                if source.is_timeout() {
                    ProxyError::Unreachable(source)
                } else {
                    ProxyError::InvalidBody { status, source }
                }
            })?;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        if status.is_success() {
            info!(%url, status = status.as_u16(), elapsed_ms, "Prediction forwarded");
        } else {
            warn!(
                %url,
                status = status.as_u16(),
                elapsed_ms,
                "Prediction service returned non-success status"
            );
        }

        Ok(Forwarded { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str, nba_path: &str) -> PredictionConfig {
        PredictionConfig {
            base_url: base_url.to_string(),
            nba_path: nba_path.to_string(),
            nfl_path: "/predict_nfl".to_string(),
            timeout_seconds: None,
        }
    }

    #[test]
    fn test_url_joining() {
        let backend = HttpPredictionBackend::new(&config("http://model:5000/", "/predict")).unwrap();
        assert_eq!(
            backend.url_for(PredictionEndpoint::Nba),
            "http://model:5000/predict"
        );
        assert_eq!(
            backend.url_for(PredictionEndpoint::Nfl),
            "http://model:5000/predict_nfl"
        );

        let backend = HttpPredictionBackend::new(&config("http://model:5000", "predict")).unwrap();
        assert_eq!(
            backend.url_for(PredictionEndpoint::Nba),
            "http://model:5000/predict"
        );
    }

    #[test]
    fn test_endpoint_display() {
        assert_eq!(PredictionEndpoint::Nba.to_string(), "nba");
        assert_eq!(PredictionEndpoint::Nfl.to_string(), "nfl");
    }
}
