//! Error handler for converting AppError to HTTP responses.
//!
//! Implements the IntoResponse trait for AppError, giving every endpoint the
//! same error body shape and status mapping: missing entities and missing
//! relationships are 404, client-side rule violations are 400, duplicates
//! are 409, infrastructure failures are 5xx.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::info!(error = %self, "Request rejected");
        }

        let error_response = match &self {
            AppError::NotFound { message } => ErrorResponse::new("NOT_FOUND", message),
            AppError::Duplicate {
                entity,
                field,
                value,
            } => ErrorResponse::new(
                "DUPLICATE_ENTRY",
                &format!("Duplicate entry: {}.{} = '{}' already exists", entity, field, value),
            ),
            AppError::Validation { field, reason } => {
                ErrorResponse::new("VALIDATION_ERROR", &format!("{}: {}", field, reason))
            }
            AppError::BadRequest { message } => ErrorResponse::new("BAD_REQUEST", message),
            AppError::UnknownState { state } => {
                ErrorResponse::new("UNKNOWN_STATE", &format!("Unknown state: {}", state))
            }
            AppError::Database { operation, .. } => ErrorResponse::new(
                "DATABASE_ERROR",
                &format!("Database operation failed: {}", operation),
            ),
            AppError::Configuration { key, .. } => {
                ErrorResponse::new("CONFIGURATION_ERROR", &format!("Configuration error: {}", key))
            }
            AppError::ConnectionPool { .. } => {
                ErrorResponse::new("SERVICE_UNAVAILABLE", "Database connection unavailable")
            }
            AppError::Internal { .. } => {
                ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred")
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. } => StatusCode::CONFLICT,
        AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::UnknownState { .. } => StatusCode::BAD_REQUEST,
        AppError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let error = AppError::not_found("Item with id = 1 not found.");
        assert_eq!(error_to_status_code(&error), StatusCode::NOT_FOUND);
    }

    #[test]
    fn domain_rejections_map_to_400() {
        let error = AppError::bad_request("Invalid booking end time.");
        assert_eq!(error_to_status_code(&error), StatusCode::BAD_REQUEST);

        let error = AppError::Validation {
            field: "email".to_string(),
            reason: "invalid format".to_string(),
        };
        assert_eq!(error_to_status_code(&error), StatusCode::BAD_REQUEST);

        let error = AppError::UnknownState {
            state: "BOGUS".to_string(),
        };
        assert_eq!(error_to_status_code(&error), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn duplicate_maps_to_409() {
        let error = AppError::Duplicate {
            entity: "users".to_string(),
            field: "email".to_string(),
            value: "a@b.c".to_string(),
        };
        assert_eq!(error_to_status_code(&error), StatusCode::CONFLICT);
    }

    #[test]
    fn infrastructure_failures_map_to_5xx() {
        let error = AppError::Internal {
            source: anyhow::anyhow!("boom"),
        };
        assert_eq!(error_to_status_code(&error), StatusCode::INTERNAL_SERVER_ERROR);

        let error = AppError::ConnectionPool {
            source: anyhow::anyhow!("pool exhausted"),
        };
        assert_eq!(error_to_status_code(&error), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn unknown_state_response_is_400() {
        let error = AppError::UnknownState {
            state: "BOGUS".to_string(),
        };
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
