//! # Database Module
//!
//! PostgreSQL integration using tokio-postgres with a deadpool connection pool.
//! Includes connection management, models, repositories, and migrations.

pub mod connection;
pub mod cursor;
pub mod error;
#[cfg(test)]
pub mod memory;
pub mod migrations;
pub mod models;
pub mod repository;
pub mod todos;
pub mod users;

pub use connection::{DatabaseConfig, DatabaseConnection};
pub use error::StorageError;
pub use models::*;
pub use repository::{Cursor, HealthCheck, TodoRepository, UserRepository};
