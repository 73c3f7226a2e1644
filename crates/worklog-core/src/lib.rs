//! Worklog Core — domain models, error taxonomy and the repository
//! traits that storage and identity backends implement.

pub mod error;
pub mod models;
pub mod repository;
