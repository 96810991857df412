//! User repository for async database operations.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::AppResult;
use crate::models::{NewUser, UpdateUser, User};

/// Storage contract for users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a new user. Duplicate email (case-insensitive) fails with
    /// `Duplicate`.
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    /// Finds a user by id.
    async fn find_by_id(&self, user_id: i32) -> AppResult<Option<User>>;

    /// Lists all users.
    async fn list_all(&self) -> AppResult<Vec<User>>;

    /// Applies a partial update; `None` fields are left unchanged.
    async fn update(&self, user_id: i32, update: UpdateUser) -> AppResult<User>;

    /// Deletes a user, returning the number of affected rows.
    async fn delete(&self, user_id: i32) -> AppResult<usize>;
}

/// PostgreSQL user repository holding an async connection pool.
///
/// Since `AsyncDbPool` (bb8::Pool) internally uses `Arc`, cloning is cheap.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: AsyncDbPool,
}

impl PgUserRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(users)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(Into::into)
    }

    async fn find_by_id(&self, user_id: i32) -> AppResult<Option<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        users
            .filter(id.eq(user_id))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(Into::into)
    }

    async fn list_all(&self) -> AppResult<Vec<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        users
            .order(id.asc())
            .select(User::as_select())
            .load(&mut conn)
            .await
            .map_err(Into::into)
    }

    async fn update(&self, user_id: i32, update: UpdateUser) -> AppResult<User> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(users.filter(id.eq(user_id)))
            .set(&update)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(Into::into)
    }

    async fn delete(&self, user_id: i32) -> AppResult<usize> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(users.filter(id.eq(user_id)))
            .execute(&mut conn)
            .await
            .map_err(Into::into)
    }
}
