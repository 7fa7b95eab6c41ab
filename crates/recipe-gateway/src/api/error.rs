//! Client-facing errors.
//!
//! | failure                                   | status |
//! |-------------------------------------------|--------|
//! | malformed id, query or body               | 422    |
//! | backend 4xx (`client_error`)              | the backend's status |
//! | backend 5xx (`server_error`)              | 502    |
//! | connection failure (`unreachable`)        | 502    |
//! | time budget elapsed (`unreachable`)       | 504    |
//! | unusable 2xx body (`invalid_response`)    | 502    |
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use crate::model::RecipeWriteError;
use fanout_framework::CompositeError;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub detail: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Composite(#[from] CompositeError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid recipe: {0}")]
    InvalidRecipe(#[from] RecipeWriteError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Composite(err) => {
                StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::InvalidRequest(_) | ApiError::InvalidRecipe(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Composite(err) = &self {
            warn!(backend = %err.backend(), kind = %err.kind(), %status, "Composite request failed");
        }
        let body = ErrorBody {
            status: status.as_u16(),
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
