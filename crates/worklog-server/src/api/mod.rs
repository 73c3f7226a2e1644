//! HTTP routes under `/api/v1`.

mod activities;
mod error;
mod users;

use std::sync::Arc;

use axum::Router;
use worklog_core::repository::{ActivityRepository, IdentityResolver, UserRepository};
use worklog_tracker::{ActivityService, UserService};

pub use error::ApiError;

/// Shared handler state.
pub struct AppState<A, U, I>
where
    A: ActivityRepository,
    U: UserRepository,
    I: IdentityResolver,
{
    pub activity: Arc<ActivityService<A>>,
    pub users: Arc<UserService<U, I>>,
}

impl<A, U, I> AppState<A, U, I>
where
    A: ActivityRepository,
    U: UserRepository,
    I: IdentityResolver,
{
    pub fn new(activity: ActivityService<A>, users: UserService<U, I>) -> Self {
        Self {
            activity: Arc::new(activity),
            users: Arc::new(users),
        }
    }
}

impl<A, U, I> Clone for AppState<A, U, I>
where
    A: ActivityRepository,
    U: UserRepository,
    I: IdentityResolver,
{
    fn clone(&self) -> Self {
        Self {
            activity: Arc::clone(&self.activity),
            users: Arc::clone(&self.users),
        }
    }
}

/// Build the application router.
pub fn router<A, U, I>(state: AppState<A, U, I>) -> Router
where
    A: ActivityRepository + 'static,
    U: UserRepository + 'static,
    I: IdentityResolver + 'static,
{
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(users::routes())
                .merge(activities::routes()),
        )
        .with_state(state)
}
