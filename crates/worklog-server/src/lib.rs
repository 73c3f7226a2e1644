//! Worklog Server — HTTP request surface, environment configuration
//! and logging setup shared by the `worklog-server` and
//! `worklog-migrate` binaries.

pub mod api;
pub mod config;
pub mod params;
pub mod telemetry;

pub use api::{AppState, router};
pub use config::{ConfigError, ServerConfig};
