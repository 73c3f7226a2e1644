//! Worklog Database — SurrealDB connection management, schema
//! migrations and the session and user stores.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Versioned schema migrations ([`run_migrations`])
//! - [`repository::SurrealActivityRepository`], the session store that
//!   enforces one open session per user
//! - [`repository::SurrealUserRepository`], the user directory
//! - Error types ([`DbError`])

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{latest_version, run_migrations};
