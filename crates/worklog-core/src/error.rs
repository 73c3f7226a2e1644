//! Error types for the Worklog system.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum WorklogError {
    #[error("user {user_id} already has an active session")]
    AlreadyActive { user_id: Uuid },

    #[error("user {user_id} has no active session")]
    NotActive { user_id: Uuid },

    #[error("user already exists")]
    UserAlreadyExists,

    #[error("no identity found for passport {serie:04} {number:06}")]
    IdentityNotFound { serie: u16, number: u32 },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Identity lookup failed: {0}")]
    IdentityLookup(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WorklogError {
    /// Transport, query and other backend failures that carry no
    /// business meaning of their own.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            WorklogError::Database(_) | WorklogError::IdentityLookup(_) | WorklogError::Internal(_)
        )
    }
}

pub type WorklogResult<T> = Result<T, WorklogError>;
