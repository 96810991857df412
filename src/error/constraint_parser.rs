use regex::Regex;
use std::sync::OnceLock;

/// Utility for parsing PostgreSQL constraint violation messages.
///
/// Extracts structured (entity, field, value) information out of the free-text
/// messages PostgreSQL produces for constraint violations.
pub struct ConstraintParser;

struct RegexPatterns {
    key_value: Regex,
    column_name: Regex,
    table_name: Regex,
}

impl RegexPatterns {
    fn new() -> Self {
        Self {
            // Matches "Key (field)=(value)" pattern in PostgreSQL messages
            key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").unwrap(),
            // Matches column names in quotes
            column_name: Regex::new(r#"column "([^"]+)""#).unwrap(),
            // Matches table names in quotes
            table_name: Regex::new(r#"table "([^"]+)""#).unwrap(),
        }
    }
}

static REGEX_PATTERNS: OnceLock<RegexPatterns> = OnceLock::new();

impl ConstraintParser {
    fn patterns() -> &'static RegexPatterns {
        REGEX_PATTERNS.get_or_init(RegexPatterns::new)
    }

    /// Parses a unique constraint violation into (entity, field, value).
    ///
    /// The constraint name is tried first (`users_email_key` → users/email);
    /// the violating value comes from the `Key (f)=(v)` detail line.
    pub fn parse_unique_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        if let Some(constraint) = constraint_name {
            if let Some((entity, field)) = Self::parse_constraint_name(constraint) {
                if let Some((_, value)) = Self::extract_key_value_from_message(message) {
                    return Some((entity, field, value));
                }
                return Some((entity, field, "duplicate_value".to_string()));
            }
        }

        if let Some((field, value)) = Self::extract_key_value_from_message(message) {
            let entity =
                Self::extract_table_from_message(message).unwrap_or_else(|| "resource".to_string());
            return Some((entity, field, value));
        }

        None
    }

    /// Parses a not-null constraint violation into (entity, field).
    pub fn parse_not_null_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        if let Some(field) = Self::extract_column_from_message(message) {
            let entity = Self::extract_table_from_message(message)
                .or_else(|| {
                    constraint_name.and_then(|c| Self::parse_constraint_name(c).map(|(e, _)| e))
                })
                .unwrap_or_else(|| "resource".to_string());
            return Some((entity, field));
        }

        None
    }

    /// Parses a foreign key violation into (entity, field, referenced value).
    pub fn parse_foreign_key_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        if let Some(constraint) = constraint_name {
            if let Some((entity, field)) = Self::parse_foreign_key_constraint_name(constraint) {
                if let Some((_, value)) = Self::extract_key_value_from_message(message) {
                    return Some((entity, field, value));
                }
                return Some((entity, field, "invalid_reference".to_string()));
            }
        }

        None
    }

    /// Splits a conventional `{table}_{column}_key` constraint name.
    pub fn parse_constraint_name(constraint: &str) -> Option<(String, String)> {
        let trimmed = constraint
            .strip_suffix("_key")
            .or_else(|| constraint.strip_suffix("_fkey"))
            .or_else(|| constraint.strip_suffix("_check"))?;
        let (entity, field) = trimmed.split_once('_')?;
        // Drop a trailing "_id" segment for fkey-style names like posts_user_id_fkey.
        let field = if constraint.ends_with("_fkey") {
            field.strip_suffix("_id").unwrap_or(field)
        } else {
            field
        };
        Some((entity.to_string(), field.to_string()))
    }

    /// Splits a `{table}_{column}_fkey` constraint name, keeping the `_id` suffix.
    pub fn parse_foreign_key_constraint_name(constraint: &str) -> Option<(String, String)> {
        let trimmed = constraint.strip_suffix("_fkey")?;
        let (entity, field) = trimmed.split_once('_')?;
        Some((entity.to_string(), field.to_string()))
    }

    /// Extracts (field, value) from a `Key (field)=(value)` detail line.
    pub fn extract_key_value_from_message(message: &str) -> Option<(String, String)> {
        let caps = Self::patterns().key_value.captures(message)?;
        Some((caps[1].to_string(), caps[2].to_string()))
    }

    /// Extracts a quoted column name from the message.
    pub fn extract_column_from_message(message: &str) -> Option<String> {
        let caps = Self::patterns().column_name.captures(message)?;
        Some(caps[1].to_string())
    }

    /// Extracts a quoted table name from the message.
    pub fn extract_table_from_message(message: &str) -> Option<String> {
        let caps = Self::patterns().table_name.captures(message)?;
        Some(caps[1].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_unique_email_violation() {
        let message = "duplicate key value violates unique constraint \"users_email_key\"\nDETAIL: Key (email)=(test@example.com) already exists.";
        let result = ConstraintParser::parse_unique_violation(message, Some("users_email_key"));
        assert_eq!(
            result,
            Some((
                "users".to_string(),
                "email".to_string(),
                "test@example.com".to_string()
            ))
        );
    }

    #[test]
    fn parses_not_null_violation() {
        let message = "null value in column \"name\" violates not-null constraint";
        let result = ConstraintParser::parse_not_null_violation(message, None);
        assert_eq!(result, Some(("resource".to_string(), "name".to_string())));
    }

    #[test]
    fn parses_foreign_key_constraint_name() {
        let result = ConstraintParser::parse_foreign_key_constraint_name("bookings_item_id_fkey");
        assert_eq!(
            result,
            Some(("bookings".to_string(), "item_id".to_string()))
        );
    }

    #[test]
    fn unique_parse_without_constraint_falls_back_to_message() {
        let message = "duplicate key value\nDETAIL: Key (email)=(dup@example.com) already exists in table \"users\".";
        let result = ConstraintParser::parse_unique_violation(message, None);
        assert_eq!(
            result,
            Some((
                "users".to_string(),
                "email".to_string(),
                "dup@example.com".to_string()
            ))
        );
    }
}
