//! Booking request handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use validator::Validate;

use crate::api::dto::{
    ApproveParams, BookingListParams, BookingResponse, CreateBookingRequest,
};
use crate::api::extract::SharerUserId;
use crate::error::AppError;
use crate::repositories::Page;
use crate::state::AppState;

/// Creates booking-related routes.
///
/// Routes:
/// - POST /                      - Place a booking as the acting user
/// - PATCH /:id?approved=        - Approve or reject as the item owner
/// - GET /:id                    - Get a booking (booker or owner only)
/// - GET /?state=&from=&size=    - The acting booker's bookings
/// - GET /owner?state=&from=&size= - Bookings of the acting owner's items
pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_by_booker).post(create_booking))
        .route("/owner", get(list_by_owner))
        .route("/{id}", get(get_booking).patch(approve_booking))
}

async fn create_booking(
    SharerUserId(user_id): SharerUserId,
    State(state): State<AppState>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state
        .services
        .bookings
        .create_booking(user_id, payload.item_id, payload.start, payload.end)
        .await?;
    Ok(Json(BookingResponse::from(booking)))
}

async fn approve_booking(
    SharerUserId(user_id): SharerUserId,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<ApproveParams>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state
        .services
        .bookings
        .approve_or_reject(id, user_id, params.approved)
        .await?;
    Ok(Json(BookingResponse::from(booking)))
}

async fn get_booking(
    SharerUserId(user_id): SharerUserId,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state.services.bookings.get_by_id(id, user_id).await?;
    Ok(Json(BookingResponse::from(booking)))
}

async fn list_by_booker(
    SharerUserId(user_id): SharerUserId,
    State(state): State<AppState>,
    Query(params): Query<BookingListParams>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    params.validate()?;
    let page = Page::from_query(params.from, params.size);
    let bookings = state
        .services
        .bookings
        .list_by_booker(user_id, &params.state, page)
        .await?;
    Ok(Json(
        bookings.into_iter().map(BookingResponse::from).collect(),
    ))
}

async fn list_by_owner(
    SharerUserId(user_id): SharerUserId,
    State(state): State<AppState>,
    Query(params): Query<BookingListParams>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    params.validate()?;
    let page = Page::from_query(params.from, params.size);
    let bookings = state
        .services
        .bookings
        .list_by_owner(user_id, &params.state, page)
        .await?;
    Ok(Json(
        bookings.into_iter().map(BookingResponse::from).collect(),
    ))
}
