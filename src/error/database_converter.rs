use crate::error::{AppError, ConstraintParser};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// Utility for converting database errors to structured AppError variants.
///
/// Handles Diesel database errors and transforms them into the matching
/// AppError variant, extracting structured information from constraint
/// violation messages where possible.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    /// Converts a Diesel error to an appropriate AppError variant.
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info, operation)
            }
            DieselError::NotFound => AppError::not_found("Requested record not found."),
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: Box<dyn diesel::result::DatabaseErrorInformation + Send + Sync>,
        operation: &str,
    ) -> AppError {
        let message = info.message();
        let constraint_name = info.constraint_name();

        match kind {
            DatabaseErrorKind::UniqueViolation => {
                if let Some((entity, field, value)) =
                    ConstraintParser::parse_unique_violation(message, constraint_name)
                {
                    AppError::Duplicate {
                        entity,
                        field,
                        value,
                    }
                } else {
                    AppError::Database {
                        operation: operation.to_string(),
                        source: anyhow::Error::msg(format!(
                            "Unique constraint violation: {}",
                            message
                        )),
                    }
                }
            }
            DatabaseErrorKind::NotNullViolation => {
                if let Some((entity, field)) =
                    ConstraintParser::parse_not_null_violation(message, constraint_name)
                {
                    AppError::Validation {
                        field,
                        reason: format!("Field is required for {}", entity),
                    }
                } else {
                    AppError::Database {
                        operation: operation.to_string(),
                        source: anyhow::Error::msg(format!(
                            "Not null constraint violation: {}",
                            message
                        )),
                    }
                }
            }
            DatabaseErrorKind::ForeignKeyViolation => {
                if let Some((entity, field, referenced_value)) =
                    ConstraintParser::parse_foreign_key_violation(message, constraint_name)
                {
                    AppError::Validation {
                        field,
                        reason: format!(
                            "Invalid reference to {} with value '{}'",
                            entity, referenced_value
                        ),
                    }
                } else {
                    AppError::Database {
                        operation: operation.to_string(),
                        source: anyhow::Error::msg(format!(
                            "Foreign key constraint violation: {}",
                            message
                        )),
                    }
                }
            }
            _ => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::msg(format!("Database error: {}", message)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockDatabaseErrorInfo {
        message: String,
        constraint_name: Option<String>,
    }

    impl diesel::result::DatabaseErrorInformation for MockDatabaseErrorInfo {
        fn message(&self) -> &str {
            &self.message
        }

        fn details(&self) -> Option<&str> {
            None
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            None
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            self.constraint_name.as_deref()
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    #[test]
    fn converts_record_not_found() {
        let result = DatabaseErrorConverter::convert_diesel_error(DieselError::NotFound, "find");
        assert!(matches!(result, AppError::NotFound { .. }));
    }

    #[test]
    fn converts_duplicate_email_to_duplicate() {
        let info = MockDatabaseErrorInfo {
            message: "duplicate key value violates unique constraint \"users_email_key\"\nDETAIL: Key (email)=(a@b.c) already exists.".to_string(),
            constraint_name: Some("users_email_key".to_string()),
        };
        let error = DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, Box::new(info));

        let result = DatabaseErrorConverter::convert_diesel_error(error, "insert user");
        match result {
            AppError::Duplicate {
                entity,
                field,
                value,
            } => {
                assert_eq!(entity, "users");
                assert_eq!(field, "email");
                assert_eq!(value, "a@b.c");
            }
            other => panic!("Expected Duplicate error, got: {:?}", other),
        }
    }

    #[test]
    fn converts_foreign_key_violation_to_validation() {
        let info = MockDatabaseErrorInfo {
            message: "insert or update on table \"bookings\" violates foreign key constraint \"bookings_item_id_fkey\"\nDETAIL: Key (item_id)=(999) is not present in table \"items\".".to_string(),
            constraint_name: Some("bookings_item_id_fkey".to_string()),
        };
        let error =
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, Box::new(info));

        let result = DatabaseErrorConverter::convert_diesel_error(error, "insert booking");
        match result {
            AppError::Validation { field, reason } => {
                assert_eq!(field, "item_id");
                assert!(reason.contains("999"));
            }
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }
}
