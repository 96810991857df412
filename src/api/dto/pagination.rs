//! Pagination-related DTOs for API requests.

use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::repositories::Page;

/// Query parameters for pagination.
///
/// `from` is the index of the first element the caller wants; `size` the page
/// length. The served window is the fixed-size page with zero-based index
/// `from / size` (integer division), not an arbitrary offset slice.
#[derive(Debug, Deserialize, IntoParams, Validate)]
pub struct PaginationParams {
    #[serde(default)]
    #[validate(range(min = 0, message = "from must not be negative"))]
    #[param(minimum = 0, example = 0)]
    pub from: i64,

    #[serde(default = "default_size")]
    #[validate(range(min = 1, message = "size must be positive"))]
    #[param(minimum = 1, example = 10)]
    pub size: i64,
}

fn default_size() -> i64 {
    10
}

impl PaginationParams {
    /// Resolves the page window. Call after `validate()`.
    pub fn to_page(&self) -> Page {
        Page::from_query(self.from, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_first_ten() {
        let params: PaginationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.from, 0);
        assert_eq!(params.size, 10);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn negative_from_and_zero_size_fail_validation() {
        let params = PaginationParams { from: -1, size: 10 };
        assert!(params.validate().is_err());

        let params = PaginationParams { from: 0, size: 0 };
        assert!(params.validate().is_err());
    }

    #[test]
    fn window_is_the_containing_page() {
        let params = PaginationParams { from: 5, size: 10 };
        assert_eq!(params.to_page(), Page::from_query(0, 10));
    }
}
