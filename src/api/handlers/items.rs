//! Item and comment request handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use validator::Validate;

use crate::api::dto::{
    CommentResponse, CreateCommentRequest, CreateItemRequest, ItemResponse,
    ItemWithBookingsResponse, PaginationParams, UpdateItemRequest,
};
use crate::api::extract::{SharerUserId, ValidatedJson};
use crate::error::AppError;
use crate::state::AppState;

/// Creates item-related routes.
///
/// Routes:
/// - GET /               - The acting user's items with booking summaries
/// - POST /              - List a new item
/// - GET /:id            - Get item by ID (summaries for the owner only)
/// - PATCH /:id          - Partially update an item (owner only)
/// - DELETE /:id         - Delete an item
/// - GET /search         - Substring search over available items
/// - POST /:id/comment   - Comment on an item after a finished booking
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_all_by_owner).post(create_item))
        .route(
            "/{id}",
            get(get_item).patch(update_item).delete(delete_item),
        )
        .route("/search", get(search_items))
        .route("/{id}/comment", post(create_comment))
}

async fn get_all_by_owner(
    SharerUserId(user_id): SharerUserId,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Vec<ItemWithBookingsResponse>>, AppError> {
    params.validate()?;
    let items = state
        .services
        .items
        .get_all_by_owner(user_id, params.to_page())
        .await?;
    Ok(Json(
        items
            .into_iter()
            .map(ItemWithBookingsResponse::from)
            .collect(),
    ))
}

async fn get_item(
    SharerUserId(user_id): SharerUserId,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ItemWithBookingsResponse>, AppError> {
    let item = state.services.items.get_by_id(user_id, id).await?;
    Ok(Json(ItemWithBookingsResponse::from(item)))
}

async fn create_item(
    SharerUserId(owner_id): SharerUserId,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateItemRequest>,
) -> Result<Json<ItemResponse>, AppError> {
    let item = state
        .services
        .items
        .create(payload.into_new_item(owner_id))
        .await?;
    Ok(Json(ItemResponse::from(item)))
}

async fn update_item(
    SharerUserId(user_id): SharerUserId,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateItemRequest>,
) -> Result<Json<ItemResponse>, AppError> {
    let item = state
        .services
        .items
        .update(user_id, id, payload.into_update_item())
        .await?;
    Ok(Json(ItemResponse::from(item)))
}

async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    state.services.items.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Query parameters for item search: the text plus the shared paging values.
#[derive(Debug, Deserialize, Validate)]
struct SearchParams {
    #[serde(default)]
    text: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "from must not be negative"))]
    from: i64,
    #[serde(default = "default_size")]
    #[validate(range(min = 1, message = "size must be positive"))]
    size: i64,
}

fn default_size() -> i64 {
    10
}

async fn search_items(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<ItemResponse>>, AppError> {
    params.validate()?;
    let page = crate::repositories::Page::from_query(params.from, params.size);
    let items = state.services.items.search(&params.text, page).await?;
    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

async fn create_comment(
    SharerUserId(user_id): SharerUserId,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<Json<CommentResponse>, AppError> {
    let comment = state
        .services
        .items
        .create_comment(user_id, id, &payload.text)
        .await?;
    Ok(Json(CommentResponse::from(comment)))
}
