//! Item service: catalog CRUD, search, and the comment gate.
//!
//! Item views rendered for the owner carry last/next booking projections;
//! any other viewer sees the item without booking summaries.

use std::sync::Arc;

use chrono::NaiveDateTime;

use super::booking_service::BookingBrief;
use crate::clock::Clock;
use crate::error::{AppError, AppResult};
use crate::models::{Comment, Item, NewComment, NewItem, UpdateItem, User};
use crate::repositories::{
    BookingRepository, CommentRepository, ItemRepository, Page, RequestRepository, UserRepository,
};

/// A comment joined with its author's display name.
#[derive(Debug, Clone)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    pub author_name: String,
}

/// An item view with booking summaries and comments attached.
///
/// `last_booking`/`next_booking` are populated only for the item's owner.
#[derive(Debug, Clone)]
pub struct ItemWithBookings {
    pub item: Item,
    pub last_booking: Option<BookingBrief>,
    pub next_booking: Option<BookingBrief>,
    pub comments: Vec<CommentWithAuthor>,
}

/// Item service for catalog and comment operations.
#[derive(Clone)]
pub struct ItemService {
    items: Arc<dyn ItemRepository>,
    users: Arc<dyn UserRepository>,
    bookings: Arc<dyn BookingRepository>,
    comments: Arc<dyn CommentRepository>,
    requests: Arc<dyn RequestRepository>,
    clock: Arc<dyn Clock>,
}

impl ItemService {
    pub fn new(
        items: Arc<dyn ItemRepository>,
        users: Arc<dyn UserRepository>,
        bookings: Arc<dyn BookingRepository>,
        comments: Arc<dyn CommentRepository>,
        requests: Arc<dyn RequestRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            items,
            users,
            bookings,
            comments,
            requests,
            clock,
        }
    }

    /// The acting user's own items with booking summaries and comments.
    pub async fn get_all_by_owner(
        &self,
        owner_id: i32,
        page: Page,
    ) -> AppResult<Vec<ItemWithBookings>> {
        let items = self.items.find_by_owner(owner_id, page).await?;
        let now = self.clock.now();
        let mut result = Vec::with_capacity(items.len());
        for item in items {
            let (last, next) = self.last_and_next(item.id, now).await?;
            let comments = self.comments_of(item.id).await?;
            result.push(ItemWithBookings {
                item,
                last_booking: last,
                next_booking: next,
                comments,
            });
        }
        Ok(result)
    }

    /// A single item; booking summaries are attached only when the viewer is
    /// the owner.
    pub async fn get_by_id(&self, user_id: i32, item_id: i32) -> AppResult<ItemWithBookings> {
        let item = self.get_existing_item(item_id).await?;
        let (last, next) = if item.owner_id == user_id {
            self.last_and_next(item.id, self.clock.now()).await?
        } else {
            (None, None)
        };
        let comments = self.comments_of(item.id).await?;
        Ok(ItemWithBookings {
            item,
            last_booking: last,
            next_booking: next,
            comments,
        })
    }

    /// Creates an item; the owner and, when given, the originating request
    /// must exist.
    pub async fn create(&self, new_item: NewItem) -> AppResult<Item> {
        self.get_existing_user(new_item.owner_id).await?;
        if let Some(request_id) = new_item.request_id {
            self.requests.find_by_id(request_id).await?.ok_or_else(|| {
                AppError::not_found(format!("Item request with id = {} not found.", request_id))
            })?;
        }
        self.items.create(new_item).await
    }

    /// Applies a partial update as the item's owner; anyone else gets
    /// NotFound. Fields that are not supplied stay unchanged.
    pub async fn update(
        &self,
        user_id: i32,
        item_id: i32,
        update: UpdateItem,
    ) -> AppResult<Item> {
        let item = self.get_existing_item(item_id).await?;
        if item.owner_id != user_id {
            return Err(AppError::not_found(
                "Only the item's owner may edit the item.",
            ));
        }
        if update.name.is_none() && update.description.is_none() && update.available.is_none() {
            return Ok(item);
        }
        self.items.update(item_id, update).await
    }

    pub async fn delete(&self, item_id: i32) -> AppResult<()> {
        self.items.delete(item_id).await?;
        Ok(())
    }

    /// Substring search over available items; blank text short-circuits to an
    /// empty result.
    pub async fn search(&self, text: &str, page: Page) -> AppResult<Vec<Item>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.items.search_available(text, page).await
    }

    /// Posts a comment on an item. Only a user with an approved booking of
    /// the item that already ended may comment.
    pub async fn create_comment(
        &self,
        user_id: i32,
        item_id: i32,
        text: &str,
    ) -> AppResult<CommentWithAuthor> {
        if text.trim().is_empty() {
            return Err(AppError::bad_request("Comment must not be blank."));
        }
        let now = self.clock.now();
        if !self
            .bookings
            .has_finished_booking(user_id, item_id, now)
            .await?
        {
            return Err(AppError::bad_request(format!(
                "User with id = {} has not completed a booking of item with id = {}.",
                user_id, item_id
            )));
        }
        let author = self.get_existing_user(user_id).await?;
        let item = self.get_existing_item(item_id).await?;

        let comment = self
            .comments
            .create(NewComment {
                text: text.to_string(),
                item_id: item.id,
                author_id: author.id,
                created: now,
            })
            .await?;
        Ok(CommentWithAuthor {
            comment,
            author_name: author.name,
        })
    }

    /// Last and next booking of an item relative to `now`: last has the
    /// greatest end before now, next the smallest start after now.
    async fn last_and_next(
        &self,
        item_id: i32,
        now: NaiveDateTime,
    ) -> AppResult<(Option<BookingBrief>, Option<BookingBrief>)> {
        let last = self.bookings.last_for_item(item_id, now).await?;
        let next = self.bookings.next_for_item(item_id, now).await?;
        Ok((
            last.as_ref().map(BookingBrief::from),
            next.as_ref().map(BookingBrief::from),
        ))
    }

    async fn comments_of(&self, item_id: i32) -> AppResult<Vec<CommentWithAuthor>> {
        let comments = self.comments.find_by_item(item_id).await?;
        let mut result = Vec::with_capacity(comments.len());
        for comment in comments {
            let author_name = self
                .users
                .find_by_id(comment.author_id)
                .await?
                .map(|u| u.name)
                .unwrap_or_default();
            result.push(CommentWithAuthor {
                comment,
                author_name,
            });
        }
        Ok(result)
    }

    async fn get_existing_user(&self, user_id: i32) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User with id = {} not found.", user_id)))
    }

    async fn get_existing_item(&self, item_id: i32) -> AppResult<Item> {
        self.items
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item with id = {} not found.", item_id)))
    }
}
