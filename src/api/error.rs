use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use axum::extract::rejection::JsonRejection;
use tracing::{error, warn};

use crate::proxy::ProxyError;

pub const UPSTREAM_FAILURE: &str = "Failed to contact Python backend";
pub const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

/// Errors a handler can return. Only the short message reaches the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Proxy(#[from] ProxyError),
    #[error("invalid JSON body: {0}")]
    BadRequest(#[from] JsonRejection),
    #[error("route not found")]
    NotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Proxy(e) => {
                error!(error = %e, "Prediction proxy failed");
                (StatusCode::INTERNAL_SERVER_ERROR, UPSTREAM_FAILURE)
            }
            ApiError::BadRequest(rejection) => {
                warn!(error = %rejection.body_text(), "Rejected request body");
                (StatusCode::BAD_REQUEST, "Invalid JSON body")
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found"),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Turns a handler panic into the generic 500 body.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic"
    };
    error!(panic = detail, "Route handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: INTERNAL_ERROR,
        }),
    )
        .into_response()
}
