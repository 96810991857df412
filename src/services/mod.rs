//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers.

mod booking_service;
mod item_service;
mod request_service;
mod user_service;

pub use booking_service::{BookingBrief, BookingService, BookingWithParties};
pub use item_service::{CommentWithAuthor, ItemService, ItemWithBookings};
pub use request_service::{RequestService, RequestWithItems};
pub use user_service::UserService;

use std::sync::Arc;

use crate::clock::Clock;
use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// This struct is designed to be used as Axum application state.
/// Cloning is cheap since repositories and the clock are behind `Arc`.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub items: ItemService,
    pub requests: RequestService,
    pub bookings: BookingService,
}

impl Services {
    /// Creates a new Services instance from Repositories and a clock.
    pub fn new(repos: Repositories, clock: Arc<dyn Clock>) -> Self {
        Self {
            users: UserService::new(repos.users.clone()),
            items: ItemService::new(
                repos.items.clone(),
                repos.users.clone(),
                repos.bookings.clone(),
                repos.comments.clone(),
                repos.requests.clone(),
                clock.clone(),
            ),
            requests: RequestService::new(
                repos.requests.clone(),
                repos.items.clone(),
                repos.users.clone(),
                clock.clone(),
            ),
            bookings: BookingService::new(
                repos.bookings,
                repos.items,
                repos.users,
                clock,
            ),
        }
    }
}
