//! Item request handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use validator::Validate;

use crate::api::dto::{
    CreateItemRequestRequest, ItemRequestResponse, ItemRequestWithItemsResponse, PaginationParams,
};
use crate::api::extract::{SharerUserId, ValidatedJson};
use crate::error::AppError;
use crate::state::AppState;

/// Creates item request routes.
///
/// Routes:
/// - POST /                 - Post a want-ad as the acting user
/// - GET /                  - The acting user's own requests
/// - GET /all?from=&size=   - Other users' requests, paged
/// - GET /:id               - A single request with its answering items
pub fn request_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_own_requests).post(create_request))
        .route("/all", get(get_requests_from_others))
        .route("/{id}", get(get_request))
}

async fn create_request(
    SharerUserId(user_id): SharerUserId,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateItemRequestRequest>,
) -> Result<Json<ItemRequestResponse>, AppError> {
    let request = state
        .services
        .requests
        .create(user_id, payload.description)
        .await?;
    Ok(Json(ItemRequestResponse::from(request)))
}

async fn get_own_requests(
    SharerUserId(user_id): SharerUserId,
    State(state): State<AppState>,
) -> Result<Json<Vec<ItemRequestWithItemsResponse>>, AppError> {
    let requests = state.services.requests.get_own(user_id).await?;
    Ok(Json(
        requests
            .into_iter()
            .map(ItemRequestWithItemsResponse::from)
            .collect(),
    ))
}

async fn get_requests_from_others(
    SharerUserId(user_id): SharerUserId,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Vec<ItemRequestWithItemsResponse>>, AppError> {
    params.validate()?;
    let requests = state
        .services
        .requests
        .get_from_others(user_id, params.to_page())
        .await?;
    Ok(Json(
        requests
            .into_iter()
            .map(ItemRequestWithItemsResponse::from)
            .collect(),
    ))
}

async fn get_request(
    SharerUserId(user_id): SharerUserId,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ItemRequestWithItemsResponse>, AppError> {
    let request = state.services.requests.get_by_id(user_id, id).await?;
    Ok(Json(ItemRequestWithItemsResponse::from(request)))
}
