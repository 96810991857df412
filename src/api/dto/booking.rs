//! Booking-related DTOs for API requests and responses.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{ItemResponse, UserResponse};
use crate::models::BookingStatus;
use crate::services::BookingWithParties;

/// Request body for placing a booking.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub item_id: i32,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Query parameter for the approve/reject decision.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ApproveParams {
    pub approved: bool,
}

/// Query parameters for the booking listings: a state filter plus the shared
/// `from`/`size` paging vocabulary.
#[derive(Debug, Deserialize, IntoParams, Validate)]
pub struct BookingListParams {
    /// One of ALL, CURRENT, PAST, FUTURE, WAITING, REJECTED.
    #[serde(default = "default_state")]
    pub state: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "from must not be negative"))]
    pub from: i64,
    #[serde(default = "default_size")]
    #[validate(range(min = 1, message = "size must be positive"))]
    pub size: i64,
}

fn default_state() -> String {
    "ALL".to_string()
}

fn default_size() -> i64 {
    10
}

/// Response body for a booking with nested item and booker snapshots.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingResponse {
    pub id: i32,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: BookingStatus,
    pub item: ItemResponse,
    pub booker: UserResponse,
}

impl From<BookingWithParties> for BookingResponse {
    fn from(view: BookingWithParties) -> Self {
        Self {
            id: view.booking.id,
            start: view.booking.start_date,
            end: view.booking.end_date,
            status: view.booking.status,
            item: ItemResponse::from(view.item),
            booker: UserResponse::from(view.booker),
        }
    }
}
