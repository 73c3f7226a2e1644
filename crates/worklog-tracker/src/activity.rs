//! Activity tracking engine: start, stop and summarize work sessions.
//!
//! The engine holds no state of its own. The single-open-session rule
//! lives in the store (see [`ActivityRepository`]); the existence
//! checks here only short-circuit the common case before writing.

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;
use worklog_core::error::{WorklogError, WorklogResult};
use worklog_core::models::activity::{ActivityFilter, ActivitySummary, Session};
use worklog_core::repository::ActivityRepository;

/// Activity tracking service.
///
/// Generic over the session store so the engine has no dependency on
/// the database crate.
pub struct ActivityService<A: ActivityRepository> {
    activity_repo: A,
}

impl<A: ActivityRepository> ActivityService<A> {
    pub fn new(activity_repo: A) -> Self {
        Self { activity_repo }
    }

    /// Open a session for `user_id` starting now.
    ///
    /// Fails with [`WorklogError::AlreadyActive`] if the user already
    /// has an open session. The caller is responsible for `user_id`
    /// naming an existing user.
    pub async fn start(&self, user_id: Uuid) -> WorklogResult<Session> {
        if self.activity_repo.has_open_session(user_id).await? {
            debug!(user_id = %user_id, "Start rejected: session already open");
            return Err(WorklogError::AlreadyActive { user_id });
        }

        // A concurrent start may still win between the check and the
        // insert; the store rejects the loser with AlreadyActive.
        self.activity_repo.create(user_id, Utc::now()).await
    }

    /// Close the user's open session at the current time.
    ///
    /// Fails with [`WorklogError::NotActive`] if no session is open.
    pub async fn stop(&self, user_id: Uuid) -> WorklogResult<Session> {
        if !self.activity_repo.has_open_session(user_id).await? {
            debug!(user_id = %user_id, "Stop rejected: no open session");
            return Err(WorklogError::NotActive { user_id });
        }

        self.activity_repo.close_open(user_id, Utc::now()).await
    }

    /// Build the activity summary for a user over an optional window.
    ///
    /// `is_active_now` always reflects the current state, whatever
    /// the window. Any failed read fails the whole summary.
    pub async fn summary(&self, filter: &ActivityFilter) -> WorklogResult<ActivitySummary> {
        let is_active_now = self.activity_repo.has_open_session(filter.user_id).await?;
        let sessions = self.activity_repo.list(filter).await?;
        let aggregate = self.activity_repo.aggregate(filter).await?;

        Ok(ActivitySummary {
            user_id: filter.user_id,
            is_active_now,
            sessions,
            total_time: aggregate.total_time,
            total_count: aggregate.total_count,
        })
    }
}
