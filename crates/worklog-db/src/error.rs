//! Database-specific error types and conversions.

use worklog_core::error::WorklogError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Malformed row: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for WorklogError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => WorklogError::NotFound { entity, id },
            other => WorklogError::Database(other.to_string()),
        }
    }
}

/// Whether a failed statement was rejected by the named UNIQUE index.
pub(crate) fn is_index_violation(message: &str, index: &str) -> bool {
    message.contains(index)
}

/// Whether a statement lost an optimistic write race to a concurrent
/// transaction.
pub(crate) fn is_write_conflict(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("transaction conflict") || message.contains("write conflict")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_keeps_entity() {
        let err: WorklogError = DbError::NotFound {
            entity: "user".into(),
            id: "abc".into(),
        }
        .into();
        assert!(matches!(err, WorklogError::NotFound { ref entity, .. } if entity == "user"));
    }

    #[test]
    fn everything_else_is_infrastructure() {
        let err: WorklogError = DbError::Query("boom".into()).into();
        assert!(err.is_infrastructure());
    }

    #[test]
    fn index_violation_matches_on_index_name() {
        let msg = "Database index `idx_user_passport` already contains [1234, 567890], \
                   with record `user:abc`";
        assert!(is_index_violation(msg, "idx_user_passport"));
        assert!(!is_index_violation(msg, "idx_activity_open_slot"));
    }

    #[test]
    fn write_conflict_is_recognised() {
        assert!(is_write_conflict(
            "Query failed: Transaction conflict: Write conflict, retry the transaction"
        ));
        assert!(!is_write_conflict("Database index `idx_user_passport` already contains"));
    }
}
