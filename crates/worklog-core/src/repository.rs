//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Services are generic over
//! these traits so the tracking and onboarding logic has no
//! dependency on a concrete store or identity backend.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::WorklogResult;
use crate::models::{
    activity::{ActivityFilter, Session, SessionAggregate},
    user::{CreateUser, IdentityInfo, User, UserFilter},
};

/// Default page size for list queries.
pub const DEFAULT_PAGE_LIMIT: u64 = 100;

/// Pagination parameters for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl Pagination {
    /// Builds pagination from a 1-based page number. A zero page is
    /// treated as the first page; offsets past the end saturate and
    /// simply yield an empty page.
    pub fn from_page(page: u64, limit: u64) -> Self {
        Self {
            offset: page.saturating_sub(1).saturating_mul(limit),
            limit,
        }
    }
}

/// A paginated result set. `total` counts every match, ignoring
/// `offset` and `limit`.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Session store
// ---------------------------------------------------------------------------

/// Durable store of activity sessions.
///
/// Implementations must enforce "at most one open session per user"
/// atomically at the store level: `create` reports
/// [`WorklogError::AlreadyActive`](crate::error::WorklogError::AlreadyActive)
/// when another open session exists, and `close_open` reports
/// [`WorklogError::NotActive`](crate::error::WorklogError::NotActive)
/// when none does.
pub trait ActivityRepository: Send + Sync {
    /// Insert an open session starting at `start_time`.
    fn create(
        &self,
        user_id: Uuid,
        start_time: DateTime<Utc>,
    ) -> impl Future<Output = WorklogResult<Session>> + Send;

    fn has_open_session(&self, user_id: Uuid) -> impl Future<Output = WorklogResult<bool>> + Send;

    /// Set `end_time` on the user's open session in a single
    /// conditional write and return the closed session.
    fn close_open(
        &self,
        user_id: Uuid,
        end_time: DateTime<Utc>,
    ) -> impl Future<Output = WorklogResult<Session>> + Send;

    /// Sessions matching the filter, ordered by start time.
    fn list(
        &self,
        filter: &ActivityFilter,
    ) -> impl Future<Output = WorklogResult<Vec<Session>>> + Send;

    fn aggregate(
        &self,
        filter: &ActivityFilter,
    ) -> impl Future<Output = WorklogResult<SessionAggregate>> + Send;
}

// ---------------------------------------------------------------------------
// User directory
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    /// Persist a new user. A duplicate passport pair is reported as
    /// [`WorklogError::UserAlreadyExists`](crate::error::WorklogError::UserAlreadyExists).
    fn create(&self, input: CreateUser) -> impl Future<Output = WorklogResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = WorklogResult<User>> + Send;
    /// Filtered page ordered by id.
    fn list(
        &self,
        filter: &UserFilter,
        pagination: Pagination,
    ) -> impl Future<Output = WorklogResult<PaginatedResult<User>>> + Send;
}

// ---------------------------------------------------------------------------
// Identity lookup
// ---------------------------------------------------------------------------

pub trait IdentityResolver: Send + Sync {
    /// Resolve a passport pair to biographical fields. Unknown pairs
    /// are reported as
    /// [`WorklogError::IdentityNotFound`](crate::error::WorklogError::IdentityNotFound).
    fn resolve(
        &self,
        serie: u16,
        number: u32,
    ) -> impl Future<Output = WorklogResult<IdentityInfo>> + Send;
}
