//! SurrealDB repository implementations.

mod activity;
mod user;

pub use activity::SurrealActivityRepository;
pub use user::SurrealUserRepository;
