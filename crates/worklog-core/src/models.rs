//! Domain models for Worklog.
//!
//! These are the core types shared across all crates.

pub mod activity;
pub mod user;
