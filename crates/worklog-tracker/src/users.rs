//! User onboarding and directory listing.

use tracing::debug;
use uuid::Uuid;
use worklog_core::error::WorklogResult;
use worklog_core::models::user::{AddUser, CreateUser, User, UserFilter};
use worklog_core::repository::{IdentityResolver, PaginatedResult, Pagination, UserRepository};

/// Onboards users by passport and serves the user directory.
pub struct UserService<U: UserRepository, I: IdentityResolver> {
    user_repo: U,
    identity: I,
}

impl<U: UserRepository, I: IdentityResolver> UserService<U, I> {
    pub fn new(user_repo: U, identity: I) -> Self {
        Self {
            user_repo,
            identity,
        }
    }

    /// Resolve the passport and persist the resulting user.
    ///
    /// Lookup failures propagate unchanged and nothing is written. A
    /// passport already on file fails with
    /// [`UserAlreadyExists`](worklog_core::error::WorklogError::UserAlreadyExists).
    /// Neither step is retried.
    pub async fn add_user(&self, input: AddUser) -> WorklogResult<User> {
        let info = self
            .identity
            .resolve(input.passport_serie, input.passport_number)
            .await?;
        debug!(surname = %info.surname, "Passport resolved");

        self.user_repo
            .create(CreateUser::from_identity(input, info))
            .await
    }

    pub async fn get_user(&self, id: Uuid) -> WorklogResult<User> {
        self.user_repo.get_by_id(id).await
    }

    pub async fn list_users(
        &self,
        filter: &UserFilter,
        pagination: Pagination,
    ) -> WorklogResult<PaginatedResult<User>> {
        self.user_repo.list(filter, pagination).await
    }
}
