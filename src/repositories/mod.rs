//! Repository layer for data access operations.
//!
//! Each entity gets a narrow trait with two implementations: a diesel_async
//! PostgreSQL repository for production and an in-memory repository for
//! deterministic tests (`memory`).

mod booking_repo;
mod comment_repo;
mod item_repo;
pub mod memory;
mod request_repo;
mod user_repo;

pub use booking_repo::{BookingRepository, PgBookingRepository};
pub use comment_repo::{CommentRepository, PgCommentRepository};
pub use item_repo::{ItemRepository, PgItemRepository};
pub use request_repo::{PgRequestRepository, RequestRepository};
pub use user_repo::{PgUserRepository, UserRepository};

use std::sync::Arc;

use crate::db::AsyncDbPool;

/// A fixed-size window into a sorted result set.
///
/// Callers supply `from` (offset) and `size`; the served window is the page
/// with zero-based index `from / size`, not an arbitrary offset slice.
/// `from=5,size=10` therefore yields page 0. Kept as-is from the original
/// contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    offset: i64,
    limit: i64,
}

impl Page {
    /// Builds the page window from raw `from`/`size` query values.
    ///
    /// Both values are validated at the API boundary (`from >= 0`, `size > 0`)
    /// before they reach this constructor.
    pub fn from_query(from: i64, size: i64) -> Self {
        let page_index = from / size;
        Self {
            offset: page_index * size,
            limit: size,
        }
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }
}

/// Aggregates all repositories for convenient access.
///
/// Holds trait objects so services stay oblivious to the backing store.
/// Cloning is cheap (Arc all the way down).
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub items: Arc<dyn ItemRepository>,
    pub requests: Arc<dyn RequestRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

impl Repositories {
    /// Creates PostgreSQL-backed repositories over the given connection pool.
    pub fn postgres(pool: AsyncDbPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            items: Arc::new(PgItemRepository::new(pool.clone())),
            requests: Arc::new(PgRequestRepository::new(pool.clone())),
            bookings: Arc::new(PgBookingRepository::new(pool.clone())),
            comments: Arc::new(PgCommentRepository::new(pool)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_index_comes_from_integer_division() {
        let page = Page::from_query(5, 10);
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 10);

        let page = Page::from_query(20, 10);
        assert_eq!(page.offset(), 20);

        let page = Page::from_query(25, 10);
        assert_eq!(page.offset(), 20);
    }

    #[test]
    fn first_page_starts_at_zero() {
        let page = Page::from_query(0, 10);
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 10);
    }

    proptest::proptest! {
        #[test]
        fn window_always_contains_from(from in 0i64..10_000, size in 1i64..500) {
            let page = Page::from_query(from, size);
            // The served page is the one containing `from`, aligned to size.
            proptest::prop_assert_eq!(page.offset() % size, 0);
            proptest::prop_assert!(page.offset() <= from);
            proptest::prop_assert!(from < page.offset() + size);
            proptest::prop_assert_eq!(page.limit(), size);
        }
    }
}
