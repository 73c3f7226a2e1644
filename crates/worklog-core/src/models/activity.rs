//! Activity session and summary models.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One work session. `end_time` is `None` while the session is open.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Elapsed time of a closed session.
    pub fn duration(&self) -> Option<Duration> {
        self.end_time.map(|end| end - self.start_time)
    }
}

/// Time window over session queries. Both bounds are optional and
/// independent: `start_time` bounds session starts from below,
/// `end_time` bounds session ends from above.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityFilter {
    pub user_id: Uuid,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl ActivityFilter {
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id,
            start_time: None,
            end_time: None,
        }
    }

    pub fn starting_from(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn ending_by(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }
}

/// Store-computed totals over a filtered set of sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionAggregate {
    /// Sum of `end - start` over closed sessions only.
    pub total_time: Duration,
    /// Number of matching sessions, open ones included.
    pub total_count: u64,
}

impl Default for SessionAggregate {
    fn default() -> Self {
        Self {
            total_time: Duration::zero(),
            total_count: 0,
        }
    }
}

/// Derived per-user view; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub user_id: Uuid,
    /// Real-time state, independent of the requested window.
    pub is_active_now: bool,
    pub sessions: Vec<Session>,
    #[serde(with = "duration_nanos")]
    pub total_time: Duration,
    pub total_count: u64,
}

/// Serializes a [`Duration`] as integer nanoseconds.
mod duration_nanos {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        match value.num_nanoseconds() {
            Some(nanos) => serializer.serialize_i64(nanos),
            None => Err(serde::ser::Error::custom("duration overflows i64 nanoseconds")),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        i64::deserialize(deserializer).map(Duration::nanoseconds)
    }
}
