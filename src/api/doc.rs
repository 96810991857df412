use utoipa::OpenApi;

pub const USER_TAG: &str = "Users";
pub const ITEM_TAG: &str = "Items";
pub const BOOKING_TAG: &str = "Bookings";
pub const REQUEST_TAG: &str = "Item requests";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ShareIt",
        description = "Peer-to-peer item rental: list items, book them, answer item requests. \
                       The acting user is passed in the X-Sharer-User-Id header.",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::api::dto::UserResponse,
            crate::api::dto::ItemResponse,
            crate::api::dto::ItemWithBookingsResponse,
            crate::api::dto::CommentResponse,
            crate::api::dto::BookingResponse,
            crate::api::dto::ItemRequestResponse,
            crate::api::dto::ItemRequestWithItemsResponse,
            crate::models::BookingStatus,
            crate::services::BookingBrief,
        )
    ),
    tags(
        (name = USER_TAG, description = "User management endpoints"),
        (name = ITEM_TAG, description = "Item catalog, search, and comments"),
        (name = BOOKING_TAG, description = "Booking lifecycle and listings"),
        (name = REQUEST_TAG, description = "Item want-ads and their answers"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
