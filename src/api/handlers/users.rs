//! User CRUD request handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::api::dto::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::api::extract::ValidatedJson;
use crate::error::AppError;
use crate::state::AppState;

/// Creates user-related routes.
///
/// Routes:
/// - GET /        - List all users
/// - POST /       - Create a new user
/// - GET /:id     - Get user by ID
/// - PATCH /:id   - Partially update user by ID
/// - DELETE /:id  - Delete user by ID
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = state.services.users.list_users().await?;
    let responses: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(responses))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.services.users.get_user(id).await?;
    Ok(Json(UserResponse::from(user)))
}

async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .services
        .users
        .create_user(payload.into_new_user())
        .await?;
    Ok(Json(UserResponse::from(user)))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .services
        .users
        .update_user(id, payload.into_update_user())
        .await?;
    Ok(Json(UserResponse::from(user)))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    state.services.users.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
