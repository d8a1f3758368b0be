//! Health check endpoint for service monitoring.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{error::AppError, routes::AppState};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,

    /// Number of API keys currently held, revoked ones included
    pub keys: usize,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "healthy",
///   "keys": 3,
///   "timestamp": "2026-10-17T19:00:00Z"
/// }
/// ```
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, AppError> {
    let keys = state.store.count()?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        keys,
        timestamp: Utc::now(),
    }))
}
