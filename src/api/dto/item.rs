//! Item-related DTOs, including comment payloads and the owner's item view
//! with booking summaries.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Item, NewItem, UpdateItem};
use crate::services::{BookingBrief, CommentWithAuthor, ItemWithBookings};

/// Request body for listing a new item.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    #[validate(length(min = 1, message = "Name must not be blank"))]
    pub name: String,
    #[validate(length(min = 1, message = "Description must not be blank"))]
    pub description: String,
    pub available: bool,
    /// Id of the item request this listing answers, if any.
    pub request_id: Option<i32>,
}

impl CreateItemRequest {
    pub fn into_new_item(self, owner_id: i32) -> NewItem {
        NewItem {
            name: self.name,
            description: self.description,
            available: self.available,
            owner_id,
            request_id: self.request_id,
        }
    }
}

/// Request body for a partial item update; absent fields are left unchanged.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateItemRequest {
    #[validate(length(min = 1, message = "Name must not be blank"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Description must not be blank"))]
    pub description: Option<String>,
    pub available: Option<bool>,
}

impl UpdateItemRequest {
    pub fn into_update_item(self) -> UpdateItem {
        UpdateItem {
            name: self.name,
            description: self.description,
            available: self.available,
        }
    }
}

/// Response body for item data.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<i32>,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            available: item.available,
            request_id: item.request_id,
        }
    }
}

/// Item view with booking summaries and comments, as served to the owner
/// (other viewers get `null` booking summaries).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemWithBookingsResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub last_booking: Option<BookingBrief>,
    pub next_booking: Option<BookingBrief>,
    pub comments: Vec<CommentResponse>,
}

impl From<ItemWithBookings> for ItemWithBookingsResponse {
    fn from(view: ItemWithBookings) -> Self {
        Self {
            id: view.item.id,
            name: view.item.name,
            description: view.item.description,
            available: view.item.available,
            last_booking: view.last_booking,
            next_booking: view.next_booking,
            comments: view.comments.into_iter().map(CommentResponse::from).collect(),
        }
    }
}

/// Request body for commenting on an item.
///
/// Blankness is a domain rule (the comment gate), so the text is not
/// validator-checked here.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCommentRequest {
    pub text: String,
}

/// Response body for a comment.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i32,
    pub text: String,
    pub author_name: String,
    pub created: NaiveDateTime,
}

impl From<CommentWithAuthor> for CommentResponse {
    fn from(view: CommentWithAuthor) -> Self {
        Self {
            id: view.comment.id,
            text: view.comment.text,
            author_name: view.author_name,
            created: view.comment.created,
        }
    }
}
