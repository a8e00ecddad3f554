//! Liveness endpoint.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::server::ApiContext;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Active store backend ("memory" or "postgres").
    pub backend: String,
    pub timestamp: DateTime<Utc>,
}

pub async fn health(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        backend: ctx.store.backend_name().to_string(),
        timestamp: Utc::now(),
    })
}
