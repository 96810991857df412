//! Item request repository for async database operations.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::Page;
use crate::db::AsyncDbPool;
use crate::error::AppResult;
use crate::models::{ItemRequest, NewItemRequest};

/// Storage contract for item requests.
#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn create(&self, new_request: NewItemRequest) -> AppResult<ItemRequest>;

    async fn find_by_id(&self, request_id: i32) -> AppResult<Option<ItemRequest>>;

    /// A requester's own requests, ascending by creation time.
    async fn find_by_requester(&self, requester_id: i32) -> AppResult<Vec<ItemRequest>>;

    /// Everyone else's requests, ascending by creation time, paged.
    async fn find_all_except(&self, requester_id: i32, page: Page)
    -> AppResult<Vec<ItemRequest>>;
}

/// PostgreSQL item request repository holding an async connection pool.
#[derive(Clone)]
pub struct PgRequestRepository {
    pool: AsyncDbPool,
}

impl PgRequestRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequestRepository for PgRequestRepository {
    async fn create(&self, new_request: NewItemRequest) -> AppResult<ItemRequest> {
        use crate::schema::requests::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(requests)
            .values(&new_request)
            .returning(ItemRequest::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(Into::into)
    }

    async fn find_by_id(&self, request_id: i32) -> AppResult<Option<ItemRequest>> {
        use crate::schema::requests::dsl::*;
        let mut conn = self.pool.get().await?;

        requests
            .filter(id.eq(request_id))
            .select(ItemRequest::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(Into::into)
    }

    async fn find_by_requester(&self, requester: i32) -> AppResult<Vec<ItemRequest>> {
        use crate::schema::requests::dsl::*;
        let mut conn = self.pool.get().await?;

        requests
            .filter(requester_id.eq(requester))
            .order(created.asc())
            .select(ItemRequest::as_select())
            .load(&mut conn)
            .await
            .map_err(Into::into)
    }

    async fn find_all_except(
        &self,
        requester: i32,
        page: Page,
    ) -> AppResult<Vec<ItemRequest>> {
        use crate::schema::requests::dsl::*;
        let mut conn = self.pool.get().await?;

        requests
            .filter(requester_id.ne(requester))
            .order(created.asc())
            .offset(page.offset())
            .limit(page.limit())
            .select(ItemRequest::as_select())
            .load(&mut conn)
            .await
            .map_err(Into::into)
    }
}
