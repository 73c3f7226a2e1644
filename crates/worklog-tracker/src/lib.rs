//! Worklog Tracker — the activity tracking engine, user onboarding
//! and the passport identity client.

pub mod activity;
pub mod config;
pub mod error;
pub mod identity;
pub mod users;

pub use activity::ActivityService;
pub use config::TrackerConfig;
pub use error::IdentityError;
pub use identity::HttpIdentityResolver;
pub use users::UserService;
