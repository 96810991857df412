//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{logging_middleware, request_id_middleware};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// Middleware is applied in reverse order of declaration (last added runs
/// first): the request ID middleware runs before logging so every log line
/// carries the ID.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/users", handlers::users::user_routes())
        .nest("/items", handlers::items::item_routes())
        .nest("/bookings", handlers::bookings::booking_routes())
        .nest("/requests", handlers::requests::request_routes())
        .merge(handlers::health::health_routes())
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
