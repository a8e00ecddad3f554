//! HTTP-facing error taxonomy.
//!
//! Every handler failure converts into a status code plus a
//! `{ "message": ... }` body — the front-end surfaces the message text
//! directly. Internal errors are logged server-side and reported with a
//! generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing request fields. No partial effect.
    #[error("{0}")]
    BadRequest(String),
    /// Missing/invalid/expired token, wrong approval codes, or bad
    /// credentials.
    #[error("{0}")]
    Unauthorized(String),
    /// Unknown user, portfolio, or asset.
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::Internal(e) => {
                tracing::error!("internal error: {e:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
