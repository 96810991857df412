//! Comment repository for async database operations.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::AppResult;
use crate::models::{Comment, NewComment};

/// Storage contract for comments.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, new_comment: NewComment) -> AppResult<Comment>;

    /// All comments on an item, ascending by creation time.
    async fn find_by_item(&self, item_id: i32) -> AppResult<Vec<Comment>>;
}

/// PostgreSQL comment repository holding an async connection pool.
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: AsyncDbPool,
}

impl PgCommentRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn create(&self, new_comment: NewComment) -> AppResult<Comment> {
        use crate::schema::comments::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(comments)
            .values(&new_comment)
            .returning(Comment::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(Into::into)
    }

    async fn find_by_item(&self, item: i32) -> AppResult<Vec<Comment>> {
        use crate::schema::comments::dsl::*;
        let mut conn = self.pool.get().await?;

        comments
            .filter(item_id.eq(item))
            .order(created.asc())
            .select(Comment::as_select())
            .load(&mut conn)
            .await
            .map_err(Into::into)
    }
}
