//! Auth Error Types
//!
//! Closed error taxonomy for every credential and session operation.
//! Backend responses are classified into these variants in
//! `infra::gotrue`; nothing downstream inspects raw backend errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{
    app_error::{AppError, ErrorBody, GENERIC_ERROR_MESSAGE},
    kind::ErrorKind,
};
use platform::password::PasswordPolicyError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Structured error returned by auth actions: `{code, message, status}`
pub type ActionError = ErrorBody;

pub const CODE_CREDENTIALS: &str = "auth/error";
pub const CODE_UNCONFIRMED: &str = "auth/unconfirmed";
pub const CODE_NO_SESSION: &str = "auth/no-session";
pub const CODE_INVALID_INPUT: &str = "auth/invalid-input";
pub const CODE_UNEXPECTED: &str = "auth/unexpected";

/// Auth-specific error variants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Backend rejected the credentials; message is shown verbatim
    #[error("{0}")]
    InvalidCredentials(String),

    /// Account exists but the email address was never confirmed
    #[error("Email not confirmed")]
    EmailNotConfirmed,

    /// Credentials were accepted but no session came back
    #[error("No session returned after login")]
    NoSession,

    /// Access/refresh token rejected or expired
    #[error("Session not found or expired")]
    SessionInvalid,

    #[error("User already registered")]
    UserAlreadyRegistered,

    #[error("{0}")]
    PasswordPolicy(String),

    #[error("{0}")]
    InvalidInput(String),

    /// Backend answered with a server error
    #[error("Backend error {status}: {message}")]
    Backend { status: u16, message: String },

    /// Backend could not be reached
    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        if self.is_unexpected() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::BAD_REQUEST
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        if self.is_unexpected() {
            ErrorKind::InternalServerError
        } else {
            ErrorKind::BadRequest
        }
    }

    /// Machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials(_)
            | AuthError::SessionInvalid
            | AuthError::UserAlreadyRegistered => CODE_CREDENTIALS,
            AuthError::EmailNotConfirmed => CODE_UNCONFIRMED,
            AuthError::NoSession => CODE_NO_SESSION,
            AuthError::PasswordPolicy(_) | AuthError::InvalidInput(_) => CODE_INVALID_INPUT,
            AuthError::Backend { .. } | AuthError::Network(_) | AuthError::Internal(_) => {
                CODE_UNEXPECTED
            }
        }
    }

    /// Infrastructure failure rather than something the user can fix
    pub fn is_unexpected(&self) -> bool {
        matches!(
            self,
            AuthError::Backend { .. } | AuthError::Network(_) | AuthError::Internal(_)
        )
    }

    /// Message safe to render in a form
    pub fn user_message(&self) -> String {
        if self.is_unexpected() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.user_message()).with_code(self.code())
    }

    pub fn to_action_error(&self) -> ActionError {
        ActionError {
            code: self.code().to_string(),
            message: self.user_message(),
            status: self.status_code().as_u16(),
        }
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            AuthError::Backend { status, message } => {
                tracing::error!(status, message = %message, "Auth backend error");
            }
            AuthError::Network(msg) => {
                tracing::error!(message = %msg, "Auth backend unreachable");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials(_) | AuthError::EmailNotConfirmed => {
                tracing::warn!(error = %self, "Rejected login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<PasswordPolicyError> for AuthError {
    fn from(err: PasswordPolicyError) -> Self {
        AuthError::PasswordPolicy(err.to_string())
    }
}
