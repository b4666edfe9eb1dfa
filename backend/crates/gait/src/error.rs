//! Gait Error Types
//!
//! Data-query errors for the dashboard. Backend failures are classified
//! here and converted into the kernel [`AppError`] envelope for responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::backend::BackendError;
use thiserror::Error;

/// Gait-specific result type alias
pub type GaitResult<T> = Result<T, GaitError>;

pub const CODE_UNAUTHORIZED: &str = "gait/unauthorized";
pub const CODE_NOT_FOUND: &str = "gait/not-found";
pub const CODE_INVALID_INPUT: &str = "gait/invalid-input";
pub const CODE_UNAVAILABLE: &str = "gait/unavailable";
pub const CODE_UNEXPECTED: &str = "gait/unexpected";

#[derive(Debug, Error)]
pub enum GaitError {
    /// Access token rejected by the table API
    #[error("Session expired")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    /// Table API answered with an error status
    #[error("Backend error {status}: {message}")]
    Backend { status: u16, message: String },

    /// Table API could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// Rows did not have the expected shape
    #[error("Malformed record: {0}")]
    Decode(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GaitError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GaitError::Unauthorized => StatusCode::UNAUTHORIZED,
            GaitError::NotFound(_) => StatusCode::NOT_FOUND,
            GaitError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GaitError::Backend { .. } | GaitError::Decode(_) => StatusCode::BAD_GATEWAY,
            GaitError::Network(_) => StatusCode::SERVICE_UNAVAILABLE,
            GaitError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GaitError::Unauthorized => ErrorKind::Unauthorized,
            GaitError::NotFound(_) => ErrorKind::NotFound,
            GaitError::InvalidInput(_) => ErrorKind::BadRequest,
            GaitError::Backend { .. } | GaitError::Decode(_) => ErrorKind::BadGateway,
            GaitError::Network(_) => ErrorKind::ServiceUnavailable,
            GaitError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            GaitError::Unauthorized => CODE_UNAUTHORIZED,
            GaitError::NotFound(_) => CODE_NOT_FOUND,
            GaitError::InvalidInput(_) => CODE_INVALID_INPUT,
            GaitError::Network(_) => CODE_UNAVAILABLE,
            GaitError::Backend { .. } | GaitError::Decode(_) | GaitError::Internal(_) => {
                CODE_UNEXPECTED
            }
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            GaitError::Backend { status, message } => {
                tracing::error!(status, message = %message, "Gait data backend error");
            }
            GaitError::Network(msg) => {
                tracing::error!(message = %msg, "Gait data backend unreachable");
            }
            GaitError::Decode(msg) | GaitError::Internal(msg) => {
                tracing::error!(message = %msg, "Gait data internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Gait error");
            }
        }
    }
}

impl From<BackendError> for GaitError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Transport(e) => GaitError::Network(e.to_string()),
            BackendError::Decode(msg) => GaitError::Decode(msg),
            BackendError::Status { status, body } => match status.as_u16() {
                401 | 403 => GaitError::Unauthorized,
                code => GaitError::Backend {
                    status: code,
                    message: body,
                },
            },
        }
    }
}

impl From<GaitError> for AppError {
    fn from(err: GaitError) -> Self {
        AppError::new(err.kind(), err.to_string()).with_code(err.code())
    }
}

impl IntoResponse for GaitError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::backend::StatusCode as BackendStatus;

    #[test]
    fn test_backend_status_classification() {
        let err = GaitError::from(BackendError::Status {
            status: BackendStatus::UNAUTHORIZED,
            body: r#"{"message":"JWT expired"}"#.into(),
        });
        assert!(matches!(err, GaitError::Unauthorized));
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let err = GaitError::from(BackendError::Status {
            status: BackendStatus::INTERNAL_SERVER_ERROR,
            body: "boom".into(),
        });
        assert_eq!(err.code(), CODE_UNEXPECTED);
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_server_errors_hide_details() {
        let app: AppError = GaitError::Backend {
            status: 500,
            message: "relation \"alerts\" does not exist".into(),
        }
        .into();

        let body = app.to_body();
        assert_eq!(body.code, CODE_UNEXPECTED);
        assert_eq!(body.message, "An unexpected error occurred");
        assert_eq!(body.status, 502);
    }

    #[test]
    fn test_not_found_message() {
        let app: AppError = GaitError::NotFound("Alert 7".into()).into();
        assert_eq!(app.to_body().message, "Alert 7 not found");
    }
}
