//! In-memory repository implementations.
//!
//! Mirror the paging, filtering, and sort contracts of the PostgreSQL
//! repositories over plain vectors, so service-level tests run without a
//! database and with a pinned clock.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::{
    BookingRepository, CommentRepository, ItemRepository, Page, Repositories, RequestRepository,
    UserRepository,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    Booking, BookingState, BookingStatus, Comment, Item, ItemRequest, NewBooking, NewComment,
    NewItem, NewItemRequest, NewUser, UpdateItem, UpdateUser, User,
};

impl Repositories {
    /// Creates in-memory repositories, empty, for tests.
    ///
    /// The booking repository shares the item table so owner listings can
    /// resolve item ownership the way the SQL join does.
    pub fn in_memory() -> Self {
        let items = Arc::new(InMemoryItemRepository::default());
        Self {
            users: Arc::new(InMemoryUserRepository::default()),
            items: items.clone(),
            requests: Arc::new(InMemoryRequestRepository::default()),
            bookings: Arc::new(InMemoryBookingRepository::new(items)),
            comments: Arc::new(InMemoryCommentRepository::default()),
        }
    }
}

struct Table<T> {
    rows: Vec<T>,
    next_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

fn page_slice<T>(rows: Vec<T>, page: Page) -> Vec<T> {
    rows.into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect()
}

fn missing_record() -> AppError {
    AppError::not_found("Requested record not found.")
}

// ============================================================================
// Users
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
    table: Mutex<Table<User>>,
}

impl InMemoryUserRepository {
    fn email_taken(table: &Table<User>, email: &str, excluding: Option<i32>) -> bool {
        table.rows.iter().any(|u| {
            u.email.eq_ignore_ascii_case(email) && Some(u.id) != excluding
        })
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut table = self.table.lock().unwrap();
        if Self::email_taken(&table, &new_user.email, None) {
            return Err(AppError::Duplicate {
                entity: "users".to_string(),
                field: "email".to_string(),
                value: new_user.email,
            });
        }
        let user = User {
            id: table.allocate_id(),
            name: new_user.name,
            email: new_user.email,
        };
        table.rows.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, user_id: i32) -> AppResult<Option<User>> {
        let table = self.table.lock().unwrap();
        Ok(table.rows.iter().find(|u| u.id == user_id).cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<User>> {
        let table = self.table.lock().unwrap();
        Ok(table.rows.clone())
    }

    async fn update(&self, user_id: i32, update: UpdateUser) -> AppResult<User> {
        let mut table = self.table.lock().unwrap();
        if let Some(email) = &update.email {
            if Self::email_taken(&table, email, Some(user_id)) {
                return Err(AppError::Duplicate {
                    entity: "users".to_string(),
                    field: "email".to_string(),
                    value: email.clone(),
                });
            }
        }
        let user = table
            .rows
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(missing_record)?;
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        Ok(user.clone())
    }

    async fn delete(&self, user_id: i32) -> AppResult<usize> {
        let mut table = self.table.lock().unwrap();
        let before = table.rows.len();
        table.rows.retain(|u| u.id != user_id);
        Ok(before - table.rows.len())
    }
}

// ============================================================================
// Items
// ============================================================================

#[derive(Default)]
pub struct InMemoryItemRepository {
    table: Mutex<Table<Item>>,
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn create(&self, new_item: NewItem) -> AppResult<Item> {
        let mut table = self.table.lock().unwrap();
        let item = Item {
            id: table.allocate_id(),
            name: new_item.name,
            description: new_item.description,
            available: new_item.available,
            owner_id: new_item.owner_id,
            request_id: new_item.request_id,
        };
        table.rows.push(item.clone());
        Ok(item)
    }

    async fn find_by_id(&self, item_id: i32) -> AppResult<Option<Item>> {
        let table = self.table.lock().unwrap();
        Ok(table.rows.iter().find(|i| i.id == item_id).cloned())
    }

    async fn find_by_owner(&self, owner_id: i32, page: Page) -> AppResult<Vec<Item>> {
        let table = self.table.lock().unwrap();
        let mut rows: Vec<Item> = table
            .rows
            .iter()
            .filter(|i| i.owner_id == owner_id)
            .cloned()
            .collect();
        rows.sort_by_key(|i| i.id);
        Ok(page_slice(rows, page))
    }

    async fn search_available(&self, text: &str, page: Page) -> AppResult<Vec<Item>> {
        let table = self.table.lock().unwrap();
        let needle = text.to_lowercase();
        let mut rows: Vec<Item> = table
            .rows
            .iter()
            .filter(|i| i.available)
            .filter(|i| {
                i.name.to_lowercase().contains(&needle)
                    || i.description.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        rows.sort_by_key(|i| i.id);
        Ok(page_slice(rows, page))
    }

    async fn find_by_request(&self, request_id: i32) -> AppResult<Vec<Item>> {
        let table = self.table.lock().unwrap();
        let mut rows: Vec<Item> = table
            .rows
            .iter()
            .filter(|i| i.request_id == Some(request_id))
            .cloned()
            .collect();
        rows.sort_by_key(|i| i.id);
        Ok(rows)
    }

    async fn update(&self, item_id: i32, update: UpdateItem) -> AppResult<Item> {
        let mut table = self.table.lock().unwrap();
        let item = table
            .rows
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(missing_record)?;
        if let Some(name) = update.name {
            item.name = name;
        }
        if let Some(description) = update.description {
            item.description = description;
        }
        if let Some(available) = update.available {
            item.available = available;
        }
        Ok(item.clone())
    }

    async fn delete(&self, item_id: i32) -> AppResult<usize> {
        let mut table = self.table.lock().unwrap();
        let before = table.rows.len();
        table.rows.retain(|i| i.id != item_id);
        Ok(before - table.rows.len())
    }
}

// ============================================================================
// Item requests
// ============================================================================

#[derive(Default)]
pub struct InMemoryRequestRepository {
    table: Mutex<Table<ItemRequest>>,
}

#[async_trait]
impl RequestRepository for InMemoryRequestRepository {
    async fn create(&self, new_request: NewItemRequest) -> AppResult<ItemRequest> {
        let mut table = self.table.lock().unwrap();
        let request = ItemRequest {
            id: table.allocate_id(),
            description: new_request.description,
            requester_id: new_request.requester_id,
            created: new_request.created,
        };
        table.rows.push(request.clone());
        Ok(request)
    }

    async fn find_by_id(&self, request_id: i32) -> AppResult<Option<ItemRequest>> {
        let table = self.table.lock().unwrap();
        Ok(table.rows.iter().find(|r| r.id == request_id).cloned())
    }

    async fn find_by_requester(&self, requester_id: i32) -> AppResult<Vec<ItemRequest>> {
        let table = self.table.lock().unwrap();
        let mut rows: Vec<ItemRequest> = table
            .rows
            .iter()
            .filter(|r| r.requester_id == requester_id)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.created);
        Ok(rows)
    }

    async fn find_all_except(
        &self,
        requester_id: i32,
        page: Page,
    ) -> AppResult<Vec<ItemRequest>> {
        let table = self.table.lock().unwrap();
        let mut rows: Vec<ItemRequest> = table
            .rows
            .iter()
            .filter(|r| r.requester_id != requester_id)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.created);
        Ok(page_slice(rows, page))
    }
}

// ============================================================================
// Bookings
// ============================================================================

pub struct InMemoryBookingRepository {
    table: Mutex<Table<Booking>>,
    items: Arc<InMemoryItemRepository>,
}

impl InMemoryBookingRepository {
    pub fn new(items: Arc<InMemoryItemRepository>) -> Self {
        Self {
            table: Mutex::new(Table::default()),
            items,
        }
    }

    fn items_of(&self, owner_id: i32) -> Vec<i32> {
        self.items
            .table
            .lock()
            .unwrap()
            .rows
            .iter()
            .filter(|i| i.owner_id == owner_id)
            .map(|i| i.id)
            .collect()
    }

    fn matches_state(booking: &Booking, state: BookingState, now: NaiveDateTime) -> bool {
        match state {
            BookingState::All => true,
            BookingState::Current => booking.start_date < now && booking.end_date > now,
            BookingState::Past => booking.end_date < now,
            BookingState::Future => booking.start_date > now,
            BookingState::Waiting => booking.status == BookingStatus::Waiting,
            BookingState::Rejected => booking.status == BookingStatus::Rejected,
        }
    }

    fn sorted_desc(mut rows: Vec<Booking>) -> Vec<Booking> {
        rows.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        rows
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn create(&self, new_booking: NewBooking) -> AppResult<Booking> {
        let mut table = self.table.lock().unwrap();
        let booking = Booking {
            id: table.allocate_id(),
            start_date: new_booking.start_date,
            end_date: new_booking.end_date,
            item_id: new_booking.item_id,
            booker_id: new_booking.booker_id,
            status: new_booking.status,
        };
        table.rows.push(booking.clone());
        Ok(booking)
    }

    async fn find_by_id(&self, booking_id: i32) -> AppResult<Option<Booking>> {
        let table = self.table.lock().unwrap();
        Ok(table.rows.iter().find(|b| b.id == booking_id).cloned())
    }

    async fn update_status(
        &self,
        booking_id: i32,
        status: BookingStatus,
    ) -> AppResult<Booking> {
        let mut table = self.table.lock().unwrap();
        let booking = table
            .rows
            .iter_mut()
            .find(|b| b.id == booking_id)
            .ok_or_else(missing_record)?;
        booking.status = status;
        Ok(booking.clone())
    }

    async fn list_by_booker(
        &self,
        booker_id: i32,
        state: BookingState,
        now: NaiveDateTime,
        page: Page,
    ) -> AppResult<Vec<Booking>> {
        let table = self.table.lock().unwrap();
        let rows: Vec<Booking> = table
            .rows
            .iter()
            .filter(|b| b.booker_id == booker_id)
            .filter(|b| Self::matches_state(b, state, now))
            .cloned()
            .collect();
        Ok(page_slice(Self::sorted_desc(rows), page))
    }

    async fn list_by_owner(
        &self,
        owner_id: i32,
        state: BookingState,
        now: NaiveDateTime,
        page: Page,
    ) -> AppResult<Vec<Booking>> {
        let owned = self.items_of(owner_id);
        let table = self.table.lock().unwrap();
        let rows: Vec<Booking> = table
            .rows
            .iter()
            .filter(|b| owned.contains(&b.item_id))
            .filter(|b| Self::matches_state(b, state, now))
            .cloned()
            .collect();
        Ok(page_slice(Self::sorted_desc(rows), page))
    }

    async fn last_for_item(
        &self,
        item_id: i32,
        now: NaiveDateTime,
    ) -> AppResult<Option<Booking>> {
        let table = self.table.lock().unwrap();
        Ok(table
            .rows
            .iter()
            .filter(|b| b.item_id == item_id && b.end_date < now)
            .max_by_key(|b| b.end_date)
            .cloned())
    }

    async fn next_for_item(
        &self,
        item_id: i32,
        now: NaiveDateTime,
    ) -> AppResult<Option<Booking>> {
        let table = self.table.lock().unwrap();
        Ok(table
            .rows
            .iter()
            .filter(|b| b.item_id == item_id && b.start_date > now)
            .min_by_key(|b| b.start_date)
            .cloned())
    }

    async fn has_finished_booking(
        &self,
        booker_id: i32,
        item_id: i32,
        now: NaiveDateTime,
    ) -> AppResult<bool> {
        let table = self.table.lock().unwrap();
        Ok(table.rows.iter().any(|b| {
            b.booker_id == booker_id
                && b.item_id == item_id
                && b.status == BookingStatus::Approved
                && b.end_date < now
        }))
    }
}

// ============================================================================
// Comments
// ============================================================================

#[derive(Default)]
pub struct InMemoryCommentRepository {
    table: Mutex<Table<Comment>>,
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn create(&self, new_comment: NewComment) -> AppResult<Comment> {
        let mut table = self.table.lock().unwrap();
        let comment = Comment {
            id: table.allocate_id(),
            text: new_comment.text,
            item_id: new_comment.item_id,
            author_id: new_comment.author_id,
            created: new_comment.created,
        };
        table.rows.push(comment.clone());
        Ok(comment)
    }

    async fn find_by_item(&self, item_id: i32) -> AppResult<Vec<Comment>> {
        let table = self.table.lock().unwrap();
        let mut rows: Vec<Comment> = table
            .rows
            .iter()
            .filter(|c| c.item_id == item_id)
            .cloned()
            .collect();
        rows.sort_by_key(|c| c.created);
        Ok(rows)
    }
}
