//! ShareIt
//!
//! Core library modules for the ShareIt item rental service.

pub mod api;
pub mod cli;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod models;
pub mod repositories;
pub mod schema;
pub mod server;
pub mod services;
pub mod state;

pub use state::AppState;
