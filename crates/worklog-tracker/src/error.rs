//! Identity lookup error types.

use thiserror::Error;
use worklog_core::error::WorklogError;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("passport {serie:04} {number:06} is unknown")]
    NotFound { serie: u16, number: u32 },

    #[error("identity API answered with status {0}")]
    Status(u16),

    #[error("identity API request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl From<IdentityError> for WorklogError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::NotFound { serie, number } => {
                WorklogError::IdentityNotFound { serie, number }
            }
            other => WorklogError::IdentityLookup(other.to_string()),
        }
    }
}
