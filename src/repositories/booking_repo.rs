//! Booking repository for async database operations.
//!
//! Carries the filtered/sorted/paged listing queries of the booking engine.
//! Listings are always sorted descending by start; "now" is passed in by the
//! caller so the repository stays clock-free.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::Page;
use crate::db::AsyncDbPool;
use crate::error::AppResult;
use crate::models::{Booking, BookingState, BookingStatus, NewBooking};

/// Storage contract for bookings.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, new_booking: NewBooking) -> AppResult<Booking>;

    async fn find_by_id(&self, booking_id: i32) -> AppResult<Option<Booking>>;

    /// Rewrites the status of an existing booking.
    async fn update_status(&self, booking_id: i32, status: BookingStatus) -> AppResult<Booking>;

    /// A booker's bookings narrowed by `state`, descending by start.
    async fn list_by_booker(
        &self,
        booker_id: i32,
        state: BookingState,
        now: NaiveDateTime,
        page: Page,
    ) -> AppResult<Vec<Booking>>;

    /// Bookings of all items owned by `owner_id`, narrowed by `state`,
    /// descending by start.
    async fn list_by_owner(
        &self,
        owner_id: i32,
        state: BookingState,
        now: NaiveDateTime,
        page: Page,
    ) -> AppResult<Vec<Booking>>;

    /// The item's booking with the greatest end strictly before `now`.
    async fn last_for_item(&self, item_id: i32, now: NaiveDateTime)
    -> AppResult<Option<Booking>>;

    /// The item's booking with the smallest start strictly after `now`.
    async fn next_for_item(&self, item_id: i32, now: NaiveDateTime)
    -> AppResult<Option<Booking>>;

    /// Whether the user has an approved booking of the item that already
    /// ended. Gates comment creation.
    async fn has_finished_booking(
        &self,
        booker_id: i32,
        item_id: i32,
        now: NaiveDateTime,
    ) -> AppResult<bool>;
}

/// PostgreSQL booking repository holding an async connection pool.
#[derive(Clone)]
pub struct PgBookingRepository {
    pool: AsyncDbPool,
}

impl PgBookingRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create(&self, new_booking: NewBooking) -> AppResult<Booking> {
        use crate::schema::bookings::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(bookings)
            .values(&new_booking)
            .returning(Booking::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(Into::into)
    }

    async fn find_by_id(&self, booking_id: i32) -> AppResult<Option<Booking>> {
        use crate::schema::bookings::dsl::*;
        let mut conn = self.pool.get().await?;

        bookings
            .filter(id.eq(booking_id))
            .select(Booking::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(Into::into)
    }

    async fn update_status(
        &self,
        booking_id: i32,
        new_status: BookingStatus,
    ) -> AppResult<Booking> {
        use crate::schema::bookings::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(bookings.filter(id.eq(booking_id)))
            .set(status.eq(new_status))
            .returning(Booking::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(Into::into)
    }

    async fn list_by_booker(
        &self,
        booker: i32,
        state: BookingState,
        now: NaiveDateTime,
        page: Page,
    ) -> AppResult<Vec<Booking>> {
        use crate::schema::bookings::dsl::*;
        let mut conn = self.pool.get().await?;

        let mut query = bookings
            .filter(booker_id.eq(booker))
            .select(Booking::as_select())
            .into_boxed();
        query = match state {
            BookingState::All => query,
            BookingState::Current => query
                .filter(start_date.lt(now))
                .filter(end_date.gt(now)),
            BookingState::Past => query.filter(end_date.lt(now)),
            BookingState::Future => query.filter(start_date.gt(now)),
            BookingState::Waiting => query.filter(status.eq(BookingStatus::Waiting)),
            BookingState::Rejected => query.filter(status.eq(BookingStatus::Rejected)),
        };

        query
            .order(start_date.desc())
            .offset(page.offset())
            .limit(page.limit())
            .load(&mut conn)
            .await
            .map_err(Into::into)
    }

    async fn list_by_owner(
        &self,
        owner: i32,
        state: BookingState,
        now: NaiveDateTime,
        page: Page,
    ) -> AppResult<Vec<Booking>> {
        use crate::schema::{bookings, items};
        let mut conn = self.pool.get().await?;

        let mut query = bookings::table
            .inner_join(items::table)
            .filter(items::owner_id.eq(owner))
            .select(Booking::as_select())
            .into_boxed();
        query = match state {
            BookingState::All => query,
            BookingState::Current => query
                .filter(bookings::start_date.lt(now))
                .filter(bookings::end_date.gt(now)),
            BookingState::Past => query.filter(bookings::end_date.lt(now)),
            BookingState::Future => query.filter(bookings::start_date.gt(now)),
            BookingState::Waiting => query.filter(bookings::status.eq(BookingStatus::Waiting)),
            BookingState::Rejected => query.filter(bookings::status.eq(BookingStatus::Rejected)),
        };

        query
            .order(bookings::start_date.desc())
            .offset(page.offset())
            .limit(page.limit())
            .load(&mut conn)
            .await
            .map_err(Into::into)
    }

    async fn last_for_item(
        &self,
        item: i32,
        now: NaiveDateTime,
    ) -> AppResult<Option<Booking>> {
        use crate::schema::bookings::dsl::*;
        let mut conn = self.pool.get().await?;

        bookings
            .filter(item_id.eq(item))
            .filter(end_date.lt(now))
            .order(end_date.desc())
            .select(Booking::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(Into::into)
    }

    async fn next_for_item(
        &self,
        item: i32,
        now: NaiveDateTime,
    ) -> AppResult<Option<Booking>> {
        use crate::schema::bookings::dsl::*;
        let mut conn = self.pool.get().await?;

        bookings
            .filter(item_id.eq(item))
            .filter(start_date.gt(now))
            .order(start_date.asc())
            .select(Booking::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(Into::into)
    }

    async fn has_finished_booking(
        &self,
        booker: i32,
        item: i32,
        now: NaiveDateTime,
    ) -> AppResult<bool> {
        use crate::schema::bookings::dsl::*;
        let mut conn = self.pool.get().await?;

        let found: Option<Booking> = bookings
            .filter(booker_id.eq(booker))
            .filter(item_id.eq(item))
            .filter(status.eq(BookingStatus::Approved))
            .filter(end_date.lt(now))
            .select(Booking::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(found.is_some())
    }
}
