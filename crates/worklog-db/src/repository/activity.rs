//! SurrealDB implementation of [`ActivityRepository`].
//!
//! One open session per user is enforced by the
//! `idx_activity_open_slot` UNIQUE index: an open row carries
//! `open_slot = 'open'`, a closed row carries its own record key.
//! Closing is a single conditional `UPDATE`, so two racing stops
//! cannot both close the same row. The loser of such a race is
//! reported as `AlreadyActive` or `NotActive`, never retried.

use chrono::{DateTime, Duration, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;
use worklog_core::error::{WorklogError, WorklogResult};
use worklog_core::models::activity::{ActivityFilter, Session, SessionAggregate};
use worklog_core::repository::ActivityRepository;

use crate::error::{DbError, is_index_violation, is_write_conflict};
use crate::schema::OPEN_SLOT;

const OPEN_SLOT_INDEX: &str = "idx_activity_open_slot";

#[derive(Debug, SurrealValue)]
struct ActivityRow {
    user_id: String,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, SurrealValue)]
struct ActivityRowWithId {
    record_id: String,
    user_id: String,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
}

fn parse_uuid(value: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::Decode(format!("invalid {what} UUID: {e}")))
}

impl ActivityRow {
    fn into_session(self, id: Uuid) -> Result<Session, DbError> {
        Ok(Session {
            id,
            user_id: parse_uuid(&self.user_id, "user")?,
            start_time: self.start_time,
            end_time: self.end_time,
        })
    }
}

impl ActivityRowWithId {
    fn try_into_session(self) -> Result<Session, DbError> {
        Ok(Session {
            id: parse_uuid(&self.record_id, "activity")?,
            user_id: parse_uuid(&self.user_id, "user")?,
            start_time: self.start_time,
            end_time: self.end_time,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

#[derive(Debug, SurrealValue)]
struct AggregateRow {
    total: u64,
    nanos: i64,
}

/// WHERE clause shared by listing and aggregation. A set end bound
/// excludes open sessions, which have no end to compare.
fn window_clause(filter: &ActivityFilter) -> String {
    let mut conditions = vec!["user_id = $user_id"];
    if filter.start_time.is_some() {
        conditions.push("start_time >= $start_time");
    }
    if filter.end_time.is_some() {
        conditions.push("end_time != NONE");
        conditions.push("end_time <= $end_time");
    }
    conditions.join(" AND ")
}

/// SurrealDB implementation of the session store.
#[derive(Clone)]
pub struct SurrealActivityRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealActivityRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn count_open(&self, user_id: Uuid) -> Result<u64, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM activity \
                 WHERE user_id = $user_id AND open_slot = $open_slot \
                 GROUP ALL",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("open_slot", OPEN_SLOT.to_string()))
            .await?;

        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    /// Classify a failed insert. A losing write race is re-read rather
    /// than retried: if a session is now open the caller lost to it.
    async fn start_failure(&self, user_id: Uuid, message: String) -> WorklogError {
        if is_index_violation(&message, OPEN_SLOT_INDEX) {
            return WorklogError::AlreadyActive { user_id };
        }
        if is_write_conflict(&message) {
            match self.count_open(user_id).await {
                Ok(open) if open > 0 => {
                    debug!(user_id = %user_id, "Start lost a write race");
                    return WorklogError::AlreadyActive { user_id };
                }
                Ok(_) => {}
                Err(e) => return e.into(),
            }
        }
        DbError::Query(message).into()
    }

    /// Classify a failed close. A losing write race with nothing left
    /// open means a concurrent stop closed the session first.
    async fn stop_failure(&self, user_id: Uuid, message: String) -> WorklogError {
        if is_write_conflict(&message) {
            match self.count_open(user_id).await {
                Ok(0) => {
                    debug!(user_id = %user_id, "Stop lost a write race");
                    return WorklogError::NotActive { user_id };
                }
                Ok(_) => {}
                Err(e) => return e.into(),
            }
        }
        DbError::Query(message).into()
    }
}

impl<C: Connection> ActivityRepository for SurrealActivityRepository<C> {
    async fn create(&self, user_id: Uuid, start_time: DateTime<Utc>) -> WorklogResult<Session> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let outcome = self
            .db
            .query(
                "CREATE type::record('activity', $id) SET \
                 user_id = $user_id, \
                 start_time = $start_time, \
                 open_slot = $open_slot",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", user_id.to_string()))
            .bind(("start_time", start_time))
            .bind(("open_slot", OPEN_SLOT.to_string()))
            .await
            .and_then(|response| response.check());

        let mut result = match outcome {
            Ok(result) => result,
            Err(e) => return Err(self.start_failure(user_id, e.to_string()).await),
        };

        let rows: Vec<ActivityRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "activity".into(),
            id: id_str,
        })?;

        debug!(user_id = %user_id, activity_id = %id, "Opened session");
        Ok(row.into_session(id)?)
    }

    async fn has_open_session(&self, user_id: Uuid) -> WorklogResult<bool> {
        Ok(self.count_open(user_id).await? > 0)
    }

    async fn close_open(&self, user_id: Uuid, end_time: DateTime<Utc>) -> WorklogResult<Session> {
        let outcome = self
            .db
            .query(
                "UPDATE activity SET \
                 end_time = $end_time, \
                 open_slot = meta::id(id) \
                 WHERE user_id = $user_id AND open_slot = $open_slot \
                 RETURN meta::id(id) AS record_id, user_id, start_time, end_time",
            )
            .bind(("end_time", end_time))
            .bind(("user_id", user_id.to_string()))
            .bind(("open_slot", OPEN_SLOT.to_string()))
            .await
            .and_then(|response| response.check());

        let mut result = match outcome {
            Ok(result) => result,
            Err(e) => return Err(self.stop_failure(user_id, e.to_string()).await),
        };

        let rows: Vec<ActivityRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or(WorklogError::NotActive { user_id })?;

        let session = row.try_into_session()?;
        debug!(user_id = %user_id, activity_id = %session.id, "Closed session");
        Ok(session)
    }

    async fn list(&self, filter: &ActivityFilter) -> WorklogResult<Vec<Session>> {
        let sql = format!(
            "SELECT meta::id(id) AS record_id, user_id, start_time, end_time \
             FROM activity WHERE {} ORDER BY start_time ASC",
            window_clause(filter)
        );

        debug!(sql = %sql, user_id = %filter.user_id, "Listing sessions");

        let mut builder = self
            .db
            .query(sql)
            .bind(("user_id", filter.user_id.to_string()));
        if let Some(start_time) = filter.start_time {
            builder = builder.bind(("start_time", start_time));
        }
        if let Some(end_time) = filter.end_time {
            builder = builder.bind(("end_time", end_time));
        }

        let mut result = builder
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<ActivityRowWithId> = result.take(0).map_err(DbError::from)?;
        let sessions = rows
            .into_iter()
            .map(|row| row.try_into_session())
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(sessions)
    }

    async fn aggregate(&self, filter: &ActivityFilter) -> WorklogResult<SessionAggregate> {
        // Durations come from the store's own datetime subtraction and
        // are summed as integer nanoseconds.
        let sql = format!(
            "LET $nanos = (SELECT VALUE \
                 IF end_time = NONE THEN 0 \
                 ELSE duration::nanos(end_time - start_time) END \
             FROM activity WHERE {}); \
             RETURN {{ total: array::len($nanos), nanos: math::sum($nanos) }};",
            window_clause(filter)
        );

        debug!(sql = %sql, user_id = %filter.user_id, "Aggregating sessions");

        let mut builder = self
            .db
            .query(sql)
            .bind(("user_id", filter.user_id.to_string()));
        if let Some(start_time) = filter.start_time {
            builder = builder.bind(("start_time", start_time));
        }
        if let Some(end_time) = filter.end_time {
            builder = builder.bind(("end_time", end_time));
        }

        let mut result = builder
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        // Statement 0 is the LET binding.
        let row: Option<AggregateRow> = result.take(1).map_err(DbError::from)?;
        Ok(row
            .map(|r| SessionAggregate {
                total_time: Duration::nanoseconds(r.nanos),
                total_count: r.total,
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_clause_without_bounds_filters_user_only() {
        let filter = ActivityFilter::for_user(Uuid::nil());
        assert_eq!(window_clause(&filter), "user_id = $user_id");
    }

    #[test]
    fn end_bound_excludes_open_sessions() {
        let filter = ActivityFilter::for_user(Uuid::nil()).ending_by(Utc::now());
        let clause = window_clause(&filter);
        assert!(clause.contains("end_time != NONE"));
        assert!(clause.contains("end_time <= $end_time"));
        assert!(!clause.contains("start_time"));
    }

    #[test]
    fn both_bounds_combine() {
        let now = Utc::now();
        let filter = ActivityFilter::for_user(Uuid::nil())
            .starting_from(now)
            .ending_by(now);
        assert_eq!(
            window_clause(&filter),
            "user_id = $user_id AND start_time >= $start_time \
             AND end_time != NONE AND end_time <= $end_time"
        );
    }
}
