//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use std::sync::Arc;

use crate::clock::SystemClock;
use crate::db::AsyncDbPool;
use crate::repositories::Repositories;
use crate::services::Services;

/// Application state containing all shared services and resources.
///
/// This struct is designed to be used with Axum's State extractor.
/// Cloning is cheap since both Services and AsyncDbPool use Arc internally.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Direct access to the database connection pool
    pub db_pool: AsyncDbPool,
}

impl AppState {
    /// Creates a new AppState from a database connection pool.
    ///
    /// Initializes PostgreSQL repositories and services over the system
    /// clock.
    pub fn new(pool: AsyncDbPool) -> Self {
        let repos = Repositories::postgres(pool.clone());
        let services = Services::new(repos, Arc::new(SystemClock));
        Self {
            services,
            db_pool: pool,
        }
    }
}
