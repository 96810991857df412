//! Booking engine: validation, lifecycle, and filtered listings.
//!
//! All rules here are relative to a single "now" read from the injected
//! clock at the start of each operation. The read-validate-write sequence of
//! `create_booking` and `approve_or_reject` runs as one storage operation per
//! call; no row locking is added on top of what the store provides.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::clock::Clock;
use crate::error::{AppError, AppResult};
use crate::models::{Booking, BookingState, BookingStatus, Item, NewBooking, User};
use crate::repositories::{BookingRepository, ItemRepository, Page, UserRepository};

/// A booking joined with its item and booker snapshots, as served by the API.
#[derive(Debug, Clone)]
pub struct BookingWithParties {
    pub booking: Booking,
    pub item: Item,
    pub booker: User,
}

/// Lightweight booking projection attached to item views for the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingBrief {
    pub id: i32,
    pub booker_id: i32,
}

impl From<&Booking> for BookingBrief {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            booker_id: booking.booker_id,
        }
    }
}

/// Booking service holding the booking engine's business rules.
#[derive(Clone)]
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    items: Arc<dyn ItemRepository>,
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        items: Arc<dyn ItemRepository>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            bookings,
            items,
            users,
            clock,
        }
    }

    /// Creates a booking in `WAITING` status.
    ///
    /// Validation order (first failing check wins): item exists, booker is
    /// not the owner, time range is sound, start is not in the past, item is
    /// available. "Owner cannot book own item" is deliberately a NotFound,
    /// not a permission error.
    pub async fn create_booking(
        &self,
        booker_id: i32,
        item_id: i32,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> AppResult<BookingWithParties> {
        let booker = self.get_existing_user(booker_id).await?;
        let item = self
            .items
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item with id = {} not found.", item_id)))?;
        if item.owner_id == booker_id {
            return Err(AppError::not_found(
                "The owner of an item cannot book their own item.",
            ));
        }
        if end <= start {
            return Err(AppError::bad_request("Invalid booking end time."));
        }
        if start < self.clock.now() {
            return Err(AppError::bad_request("Invalid booking start time."));
        }
        if !item.available {
            return Err(AppError::bad_request(format!(
                "Item with id = {} is not available for booking.",
                item.id
            )));
        }

        let booking = self
            .bookings
            .create(NewBooking {
                start_date: start,
                end_date: end,
                item_id,
                booker_id,
                status: BookingStatus::Waiting,
            })
            .await?;

        Ok(BookingWithParties {
            booking,
            item,
            booker,
        })
    }

    /// Approves or rejects a waiting booking, once, as the item's owner.
    ///
    /// An already-approved booking cannot be re-processed in either
    /// direction. A rejected booking carries no such guard; that asymmetry is
    /// kept from the original contract.
    pub async fn approve_or_reject(
        &self,
        booking_id: i32,
        acting_user_id: i32,
        approved: bool,
    ) -> AppResult<BookingWithParties> {
        let booking = self.get_existing_booking(booking_id).await?;
        let item = self.get_existing_item(booking.item_id).await?;
        if item.owner_id != acting_user_id {
            return Err(AppError::not_found(
                "Only the item's owner may approve a booking.",
            ));
        }
        if booking.status == BookingStatus::Approved {
            return Err(AppError::bad_request("Booking has already been approved."));
        }

        let status = if approved {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        };
        let booking = self.bookings.update_status(booking.id, status).await?;
        let booker = self.get_existing_user(booking.booker_id).await?;

        Ok(BookingWithParties {
            booking,
            item,
            booker,
        })
    }

    /// Returns a booking to its booker or the item's owner; anyone else gets
    /// NotFound.
    pub async fn get_by_id(
        &self,
        booking_id: i32,
        acting_user_id: i32,
    ) -> AppResult<BookingWithParties> {
        let booking = self.get_existing_booking(booking_id).await?;
        let item = self.get_existing_item(booking.item_id).await?;
        if booking.booker_id != acting_user_id && item.owner_id != acting_user_id {
            return Err(AppError::not_found(format!(
                "User with id = {} did not book this item.",
                acting_user_id
            )));
        }
        let booker = self.get_existing_user(booking.booker_id).await?;

        Ok(BookingWithParties {
            booking,
            item,
            booker,
        })
    }

    /// A booker's bookings narrowed by the given state filter, newest start
    /// first.
    pub async fn list_by_booker(
        &self,
        booker_id: i32,
        state: &str,
        page: Page,
    ) -> AppResult<Vec<BookingWithParties>> {
        let state: BookingState = state.parse()?;
        self.get_existing_user(booker_id).await?;
        let now = self.clock.now();
        let bookings = self
            .bookings
            .list_by_booker(booker_id, state, now, page)
            .await?;
        self.with_parties(bookings).await
    }

    /// Bookings of the acting owner's items narrowed by the given state
    /// filter, newest start first.
    pub async fn list_by_owner(
        &self,
        owner_id: i32,
        state: &str,
        page: Page,
    ) -> AppResult<Vec<BookingWithParties>> {
        let state: BookingState = state.parse()?;
        self.get_existing_user(owner_id).await?;
        let now = self.clock.now();
        let bookings = self
            .bookings
            .list_by_owner(owner_id, state, now, page)
            .await?;
        self.with_parties(bookings).await
    }

    async fn with_parties(&self, bookings: Vec<Booking>) -> AppResult<Vec<BookingWithParties>> {
        let mut result = Vec::with_capacity(bookings.len());
        for booking in bookings {
            let item = self.get_existing_item(booking.item_id).await?;
            let booker = self.get_existing_user(booking.booker_id).await?;
            result.push(BookingWithParties {
                booking,
                item,
                booker,
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

    async fn get_existing_booking(&self, booking_id: i32) -> AppResult<Booking> {
        self.bookings.find_by_id(booking_id).await?.ok_or_else(|| {
            AppError::not_found(format!("Booking with id = {} not found.", booking_id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::{NewItem, NewUser};
    use crate::repositories::Repositories;
    use chrono::{Duration, NaiveDate};

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    struct Fixture {
        repos: Repositories,
        service: BookingService,
        owner: User,
        booker: User,
        item: Item,
    }

    async fn fixture() -> Fixture {
        let repos = Repositories::in_memory();
        let clock = Arc::new(FixedClock(noon()));
        let service = BookingService::new(
            repos.bookings.clone(),
            repos.items.clone(),
            repos.users.clone(),
            clock,
        );
        let owner = repos
            .users
            .create(NewUser {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
            })
            .await
            .unwrap();
        let booker = repos
            .users
            .create(NewUser {
                name: "Bob".to_string(),
                email: "bob@example.com".to_string(),
            })
            .await
            .unwrap();
        let item = repos
            .items
            .create(NewItem {
                name: "Drill".to_string(),
                description: "Cordless drill".to_string(),
                available: true,
                owner_id: owner.id,
                request_id: None,
            })
            .await
            .unwrap();
        Fixture {
            repos,
            service,
            owner,
            booker,
            item,
        }
    }

    fn default_page() -> Page {
        Page::from_query(0, 10)
    }

    #[tokio::test]
    async fn new_booking_starts_waiting() {
        let f = fixture().await;
        let created = f
            .service
            .create_booking(
                f.booker.id,
                f.item.id,
                noon() + Duration::days(1),
                noon() + Duration::days(2),
            )
            .await
            .unwrap();
        assert_eq!(created.booking.status, BookingStatus::Waiting);
        assert_eq!(created.booking.booker_id, f.booker.id);
        assert_eq!(created.item.id, f.item.id);
    }

    #[tokio::test]
    async fn rejects_end_not_after_start_without_writing() {
        let f = fixture().await;
        for (start, end) in [
            (noon() + Duration::days(2), noon() + Duration::days(1)),
            (noon() + Duration::days(1), noon() + Duration::days(1)),
        ] {
            let err = f
                .service
                .create_booking(f.booker.id, f.item.id, start, end)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::BadRequest { .. }));
        }
        let listed = f
            .service
            .list_by_booker(f.booker.id, "ALL", default_page())
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn rejects_start_in_the_past() {
        let f = fixture().await;
        let err = f
            .service
            .create_booking(
                f.booker.id,
                f.item.id,
                noon() - Duration::hours(1),
                noon() + Duration::days(1),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn owner_cannot_book_own_item() {
        let f = fixture().await;
        let err = f
            .service
            .create_booking(
                f.owner.id,
                f.item.id,
                noon() + Duration::days(1),
                noon() + Duration::days(2),
            )
            .await
            .unwrap_err();
        // NotFound, not a permission error: kept from the original contract.
        assert!(matches!(err, AppError::NotFound { .. }));
        let listed = f
            .service
            .list_by_owner(f.owner.id, "ALL", default_page())
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn rejects_unavailable_item() {
        let f = fixture().await;
        f.repos
            .items
            .update(
                f.item.id,
                crate::models::UpdateItem {
                    available: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let err = f
            .service
            .create_booking(
                f.booker.id,
                f.item.id,
                noon() + Duration::days(1),
                noon() + Duration::days(2),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn approval_is_single_shot() {
        let f = fixture().await;
        let created = f
            .service
            .create_booking(
                f.booker.id,
                f.item.id,
                noon() + Duration::days(1),
                noon() + Duration::days(2),
            )
            .await
            .unwrap();

        let approved = f
            .service
            .approve_or_reject(created.booking.id, f.owner.id, true)
            .await
            .unwrap();
        assert_eq!(approved.booking.status, BookingStatus::Approved);

        // Re-processing an approved booking fails either way and changes nothing.
        for decision in [true, false] {
            let err = f
                .service
                .approve_or_reject(created.booking.id, f.owner.id, decision)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::BadRequest { .. }));
        }
        let current = f
            .service
            .get_by_id(created.booking.id, f.owner.id)
            .await
            .unwrap();
        assert_eq!(current.booking.status, BookingStatus::Approved);
    }

    #[tokio::test]
    async fn only_the_owner_may_approve() {
        let f = fixture().await;
        let created = f
            .service
            .create_booking(
                f.booker.id,
                f.item.id,
                noon() + Duration::days(1),
                noon() + Duration::days(2),
            )
            .await
            .unwrap();
        let err = f
            .service
            .approve_or_reject(created.booking.id, f.booker.id, true)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn visibility_is_booker_or_owner_only() {
        let f = fixture().await;
        let stranger = f
            .repos
            .users
            .create(NewUser {
                name: "Carol".to_string(),
                email: "carol@example.com".to_string(),
            })
            .await
            .unwrap();
        let created = f
            .service
            .create_booking(
                f.booker.id,
                f.item.id,
                noon() + Duration::days(1),
                noon() + Duration::days(2),
            )
            .await
            .unwrap();

        assert!(
            f.service
                .get_by_id(created.booking.id, f.booker.id)
                .await
                .is_ok()
        );
        assert!(
            f.service
                .get_by_id(created.booking.id, f.owner.id)
                .await
                .is_ok()
        );
        let err = f
            .service
            .get_by_id(created.booking.id, stranger.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    /// Seeds one past, one current, and one future booking directly through
    /// the repository so the past/current windows are reachable.
    async fn seed_straddling_bookings(f: &Fixture) -> (Booking, Booking, Booking) {
        let past = f
            .repos
            .bookings
            .create(NewBooking {
                start_date: noon() - Duration::days(3),
                end_date: noon() - Duration::days(2),
                item_id: f.item.id,
                booker_id: f.booker.id,
                status: BookingStatus::Approved,
            })
            .await
            .unwrap();
        let current = f
            .repos
            .bookings
            .create(NewBooking {
                start_date: noon() - Duration::hours(1),
                end_date: noon() + Duration::hours(1),
                item_id: f.item.id,
                booker_id: f.booker.id,
                status: BookingStatus::Approved,
            })
            .await
            .unwrap();
        let future = f
            .repos
            .bookings
            .create(NewBooking {
                start_date: noon() + Duration::days(1),
                end_date: noon() + Duration::days(2),
                item_id: f.item.id,
                booker_id: f.booker.id,
                status: BookingStatus::Waiting,
            })
            .await
            .unwrap();
        (past, current, future)
    }

    #[tokio::test]
    async fn state_filters_partition_by_the_booking_window() {
        let f = fixture().await;
        let (past, current, future) = seed_straddling_bookings(&f).await;

        let ids = |list: Vec<BookingWithParties>| {
            list.into_iter().map(|b| b.booking.id).collect::<Vec<_>>()
        };

        let all = f
            .service
            .list_by_booker(f.booker.id, "ALL", default_page())
            .await
            .unwrap();
        // Descending by start: future, current, past.
        assert_eq!(ids(all), vec![future.id, current.id, past.id]);

        let listed = f
            .service
            .list_by_booker(f.booker.id, "CURRENT", default_page())
            .await
            .unwrap();
        assert_eq!(ids(listed), vec![current.id]);

        let listed = f
            .service
            .list_by_booker(f.booker.id, "PAST", default_page())
            .await
            .unwrap();
        assert_eq!(ids(listed), vec![past.id]);

        let listed = f
            .service
            .list_by_booker(f.booker.id, "FUTURE", default_page())
            .await
            .unwrap();
        assert_eq!(ids(listed), vec![future.id]);

        let listed = f
            .service
            .list_by_booker(f.booker.id, "WAITING", default_page())
            .await
            .unwrap();
        assert_eq!(ids(listed), vec![future.id]);

        let listed = f
            .service
            .list_by_booker(f.booker.id, "REJECTED", default_page())
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn owner_listing_covers_the_owned_items() {
        let f = fixture().await;
        let (_, _, future) = seed_straddling_bookings(&f).await;

        let listed = f
            .service
            .list_by_owner(f.owner.id, "FUTURE", default_page())
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].booking.id, future.id);

        // The booker owns no items, so the owner listing is empty for them.
        let listed = f
            .service
            .list_by_owner(f.booker.id, "ALL", default_page())
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn unknown_state_is_a_distinct_error() {
        let f = fixture().await;
        for call in [
            f.service
                .list_by_booker(f.booker.id, "BOGUS", default_page())
                .await,
            f.service
                .list_by_owner(f.owner.id, "BOGUS", default_page())
                .await,
        ] {
            match call.unwrap_err() {
                AppError::UnknownState { state } => assert_eq!(state, "BOGUS"),
                other => panic!("expected UnknownState, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn listing_for_a_missing_user_fails() {
        let f = fixture().await;
        let err = f
            .service
            .list_by_booker(999, "ALL", default_page())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn listing_is_paged_by_page_index() {
        let f = fixture().await;
        for day in 1..=5 {
            f.service
                .create_booking(
                    f.booker.id,
                    f.item.id,
                    noon() + Duration::days(day),
                    noon() + Duration::days(day) + Duration::hours(12),
                )
                .await
                .unwrap();
        }

        let first = f
            .service
            .list_by_booker(f.booker.id, "ALL", Page::from_query(0, 2))
            .await
            .unwrap();
        assert_eq!(first.len(), 2);

        // from=1,size=2 still addresses page 0.
        let same = f
            .service
            .list_by_booker(f.booker.id, "ALL", Page::from_query(1, 2))
            .await
            .unwrap();
        assert_eq!(
            first.iter().map(|b| b.booking.id).collect::<Vec<_>>(),
            same.iter().map(|b| b.booking.id).collect::<Vec<_>>()
        );

        let second = f
            .service
            .list_by_booker(f.booker.id, "ALL", Page::from_query(2, 2))
            .await
            .unwrap();
        assert_eq!(second.len(), 2);
        assert_ne!(first[0].booking.id, second[0].booking.id);
    }

    #[tokio::test]
    async fn full_lifecycle_scenario() {
        // Owner lists an item, booker books it, owner approves, the booking
        // shows up in the owner's FUTURE listing, and the booker cannot
        // approve their own request.
        let f = fixture().await;
        let created = f
            .service
            .create_booking(
                f.booker.id,
                f.item.id,
                noon() + Duration::days(1),
                noon() + Duration::days(2),
            )
            .await
            .unwrap();
        assert_eq!(created.booking.status, BookingStatus::Waiting);

        let err = f
            .service
            .approve_or_reject(created.booking.id, f.booker.id, true)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));

        let approved = f
            .service
            .approve_or_reject(created.booking.id, f.owner.id, true)
            .await
            .unwrap();
        assert_eq!(approved.booking.status, BookingStatus::Approved);

        let listed = f
            .service
            .list_by_owner(f.owner.id, "FUTURE", default_page())
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].booking.id, created.booking.id);
    }
}
