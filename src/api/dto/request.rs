//! Item request DTOs for API requests and responses.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::ItemResponse;
use crate::models::ItemRequest;
use crate::services::RequestWithItems;

/// Request body for posting an item request.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateItemRequestRequest {
    #[validate(length(min = 1, message = "Description must not be blank"))]
    pub description: String,
}

/// Response body for a freshly created item request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemRequestResponse {
    pub id: i32,
    pub description: String,
    pub created: NaiveDateTime,
}

impl From<ItemRequest> for ItemRequestResponse {
    fn from(request: ItemRequest) -> Self {
        Self {
            id: request.id,
            description: request.description,
            created: request.created,
        }
    }
}

/// Response body for an item request with the items answering it.
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemRequestWithItemsResponse {
    pub id: i32,
    pub description: String,
    pub created: NaiveDateTime,
    pub items: Vec<ItemResponse>,
}

impl From<RequestWithItems> for ItemRequestWithItemsResponse {
    fn from(view: RequestWithItems) -> Self {
        Self {
            id: view.request.id,
            description: view.request.description,
            created: view.request.created,
            items: view.items.into_iter().map(ItemResponse::from).collect(),
        }
    }
}
