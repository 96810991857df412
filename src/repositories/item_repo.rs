//! Item repository for async database operations.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::Page;
use crate::db::AsyncDbPool;
use crate::error::AppResult;
use crate::models::{Item, NewItem, UpdateItem};

/// Storage contract for items.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn create(&self, new_item: NewItem) -> AppResult<Item>;

    async fn find_by_id(&self, item_id: i32) -> AppResult<Option<Item>>;

    /// An owner's items, ascending by id.
    async fn find_by_owner(&self, owner_id: i32, page: Page) -> AppResult<Vec<Item>>;

    /// Available items whose name or description contains `text`,
    /// case-insensitively, ascending by id.
    async fn search_available(&self, text: &str, page: Page) -> AppResult<Vec<Item>>;

    /// Items listed in answer to the given item request.
    async fn find_by_request(&self, request_id: i32) -> AppResult<Vec<Item>>;

    /// Applies a partial update; `None` fields are left unchanged.
    async fn update(&self, item_id: i32, update: UpdateItem) -> AppResult<Item>;

    /// Deletes an item, returning the number of affected rows.
    async fn delete(&self, item_id: i32) -> AppResult<usize>;
}

/// PostgreSQL item repository holding an async connection pool.
#[derive(Clone)]
pub struct PgItemRepository {
    pool: AsyncDbPool,
}

impl PgItemRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    async fn create(&self, new_item: NewItem) -> AppResult<Item> {
        use crate::schema::items::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(items)
            .values(&new_item)
            .returning(Item::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(Into::into)
    }

    async fn find_by_id(&self, item_id: i32) -> AppResult<Option<Item>> {
        use crate::schema::items::dsl::*;
        let mut conn = self.pool.get().await?;

        items
            .filter(id.eq(item_id))
            .select(Item::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(Into::into)
    }

    async fn find_by_owner(&self, owner: i32, page: Page) -> AppResult<Vec<Item>> {
        use crate::schema::items::dsl::*;
        let mut conn = self.pool.get().await?;

        items
            .filter(owner_id.eq(owner))
            .order(id.asc())
            .offset(page.offset())
            .limit(page.limit())
            .select(Item::as_select())
            .load(&mut conn)
            .await
            .map_err(Into::into)
    }

    async fn search_available(&self, text: &str, page: Page) -> AppResult<Vec<Item>> {
        use crate::schema::items::dsl::*;
        let mut conn = self.pool.get().await?;

        let pattern = format!("%{}%", text);
        items
            .filter(available.eq(true))
            .filter(
                name.ilike(pattern.clone())
                    .or(description.ilike(pattern)),
            )
            .order(id.asc())
            .offset(page.offset())
            .limit(page.limit())
            .select(Item::as_select())
            .load(&mut conn)
            .await
            .map_err(Into::into)
    }

    async fn find_by_request(&self, request: i32) -> AppResult<Vec<Item>> {
        use crate::schema::items::dsl::*;
        let mut conn = self.pool.get().await?;

        items
            .filter(request_id.eq(request))
            .order(id.asc())
            .select(Item::as_select())
            .load(&mut conn)
            .await
            .map_err(Into::into)
    }

    async fn update(&self, item_id: i32, update: UpdateItem) -> AppResult<Item> {
        use crate::schema::items::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(items.filter(id.eq(item_id)))
            .set(&update)
            .returning(Item::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(Into::into)
    }

    async fn delete(&self, item_id: i32) -> AppResult<usize> {
        use crate::schema::items::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(items.filter(id.eq(item_id)))
            .execute(&mut conn)
            .await
            .map_err(Into::into)
    }
}
