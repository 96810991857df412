//! Async database connection pool implementation.
//!
//! Uses bb8 connection pool manager with diesel_async for PostgreSQL connections.

use diesel::Connection;
use diesel_async::AsyncPgConnection;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::Pool;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::config::DatabaseConfig;
use crate::error::AppError;

/// Async connection pool type alias.
///
/// bb8::Pool internally uses Arc, so Clone is cheap (just reference count
/// increment). Structures holding AsyncDbPool can derive Clone without
/// additional Arc wrapping.
pub type AsyncDbPool = Pool<AsyncPgConnection>;

/// Schema migrations embedded at compile time.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Creates an async database connection pool from the database settings.
pub async fn establish_async_connection_pool(
    config: &DatabaseConfig,
) -> Result<AsyncDbPool, AppError> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.url.clone());
    let pool = Pool::builder()
        .max_size(config.max_connections)
        .min_idle(Some(config.min_connections))
        .connection_timeout(std::time::Duration::from_secs(config.connection_timeout))
        .build(manager)
        .await
        .map_err(|e| AppError::ConnectionPool {
            source: anyhow::Error::new(e),
        })?;
    Ok(pool)
}

/// Runs all pending migrations against the configured database.
///
/// Migrations use a blocking diesel connection, so the work is moved off the
/// async runtime.
pub async fn run_pending_migrations(database_url: &str) -> Result<(), AppError> {
    let url = database_url.to_string();
    tokio::task::spawn_blocking(move || -> Result<(), AppError> {
        let mut conn =
            AsyncConnectionWrapper::<AsyncPgConnection>::establish(&url).map_err(|e| {
                AppError::Configuration {
                    key: "database.url".to_string(),
                    source: anyhow::Error::new(e),
                }
            })?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| AppError::Database {
                operation: "run migrations".to_string(),
                source: anyhow::Error::msg(e.to_string()),
            })?;
        Ok(())
    })
    .await
    .map_err(|e| AppError::Internal {
        source: anyhow::Error::new(e),
    })?
}
