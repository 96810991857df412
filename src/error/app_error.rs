use crate::error::DatabaseErrorConverter;
use thiserror::Error;

/// Application-wide error type that represents all possible errors in the system.
///
/// Domain errors carry human-readable messages; infrastructure errors carry
/// their source for logging. Every variant maps to exactly one HTTP status in
/// the API layer.
#[derive(Error, Debug)]
pub enum AppError {
    /// Referenced entity does not exist, or the caller lacks the relationship
    /// required to see or act on it.
    #[error("{message}")]
    NotFound { message: String },

    /// Duplicate entry error for unique constraint violations
    #[error("Duplicate entry: {entity}.{field} = '{value}' already exists")]
    Duplicate {
        entity: String,
        field: String,
        value: String,
    },

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Input accepted by the API but rejected by a domain rule
    #[error("{message}")]
    BadRequest { message: String },

    /// A booking listing filter value outside the recognized enumeration
    #[error("Unknown state: {state}")]
    UnknownState { state: String },

    /// Database operation error with operation context
    #[error("Database operation failed: {operation}")]
    Database {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Connection pool error
    #[error("Connection pool error")]
    ConnectionPool {
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Shorthand for a NotFound with a formatted message.
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound {
            message: message.into(),
        }
    }

    /// Shorthand for a BadRequest with a formatted message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(error: diesel::result::Error) -> Self {
        DatabaseErrorConverter::convert_diesel_error(error, "database operation")
    }
}

impl<E> From<bb8::RunError<E>> for AppError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(error: bb8::RunError<E>) -> Self {
        AppError::ConnectionPool {
            source: anyhow::Error::new(error),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Report the first failing field; the client fixes one at a time anyway.
        let (field, error) = errors
            .field_errors()
            .into_iter()
            .next()
            .map(|(field, errs)| (field.to_string(), errs.first().cloned()))
            .unwrap_or_else(|| ("unknown".to_string(), None));
        let reason = error
            .and_then(|e| e.message.map(|m| m.to_string()))
            .unwrap_or_else(|| "invalid value".to_string());
        AppError::Validation { field, reason }
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_state_message_matches_contract() {
        let err = AppError::UnknownState {
            state: "SOMEDAY".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown state: SOMEDAY");
    }

    #[test]
    fn not_found_message_is_verbatim() {
        let err = AppError::not_found("Item with id = 7 not found.");
        assert_eq!(err.to_string(), "Item with id = 7 not found.");
    }

    #[test]
    fn validation_errors_pick_the_first_field() {
        use validator::Validate;

        #[derive(Validate)]
        struct Probe {
            #[validate(email(message = "Invalid email format"))]
            email: String,
        }

        let probe = Probe {
            email: "not-an-email".to_string(),
        };
        let err: AppError = probe.validate().unwrap_err().into();
        match err {
            AppError::Validation { field, reason } => {
                assert_eq!(field, "email");
                assert_eq!(reason, "Invalid email format");
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }
}
