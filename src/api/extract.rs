//! Custom axum extractors.
//!
//! `SharerUserId` resolves the acting user from the `X-Sharer-User-Id`
//! header; `ValidatedJson` runs validator-derive rules on JSON bodies before
//! the handler sees them.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Header carrying the acting user's id. Trust is by id only; there is no
/// session or token layer in front of it.
pub const SHARER_USER_ID_HEADER: &str = "x-sharer-user-id";

/// The acting user's id, taken from the `X-Sharer-User-Id` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharerUserId(pub i32);

impl<S> FromRequestParts<S> for SharerUserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> AppResult<Self> {
        let value = parts
            .headers
            .get(SHARER_USER_ID_HEADER)
            .ok_or_else(|| AppError::bad_request("Missing X-Sharer-User-Id header."))?;
        let user_id = value
            .to_str()
            .ok()
            .and_then(|v| v.parse::<i32>().ok())
            .ok_or_else(|| AppError::bad_request("Invalid X-Sharer-User-Id header."))?;
        Ok(SharerUserId(user_id))
    }
}

/// JSON body extractor that validates the payload after deserialization.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    async fn extract(header: Option<&str>) -> AppResult<SharerUserId> {
        let mut builder = HttpRequest::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(SHARER_USER_ID_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        SharerUserId::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn resolves_a_numeric_header() {
        let id = extract(Some("42")).await.unwrap();
        assert_eq!(id, SharerUserId(42));
    }

    #[tokio::test]
    async fn missing_header_is_a_bad_request() {
        let err = extract(None).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn non_numeric_header_is_a_bad_request() {
        let err = extract(Some("abc")).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
    }
}
