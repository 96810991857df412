//! Health check endpoint handlers.
//!
//! Provides health check functionality for monitoring and load balancer
//! health checks. The database check grabs a pooled connection to verify
//! connectivity.

use axum::{Router, extract::State, http::StatusCode, response::Json, routing::get};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response structure.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

/// Creates health check routes.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

async fn health_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let database_ok = state.db_pool.get().await.is_ok();
    let (status_code, status, database) = if database_ok {
        (StatusCode::OK, "healthy", "up")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "down")
    };

    (
        status_code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            database,
        }),
    )
}
