use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;
use worklog_core::error::WorklogError;

/// Error response: the status code plus `{"error": message}`.
#[derive(Debug)]
pub struct ApiError(pub WorklogError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            WorklogError::AlreadyActive { .. }
            | WorklogError::NotActive { .. }
            | WorklogError::Validation { .. } => StatusCode::BAD_REQUEST,
            WorklogError::UserAlreadyExists => StatusCode::CONFLICT,
            WorklogError::IdentityNotFound { .. } | WorklogError::NotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            WorklogError::IdentityLookup(_) => StatusCode::BAD_GATEWAY,
            WorklogError::Database(_) | WorklogError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<WorklogError> for ApiError {
    fn from(err: WorklogError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_infrastructure() {
            error!(status = status.as_u16(), error = %self.0, "Request failed");
        }
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}
