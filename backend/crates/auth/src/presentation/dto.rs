//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::UserRef;

// ============================================================================
// Login / Register / Reset
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Post-login destination
    #[serde(default)]
    pub redirect_to: Option<String>,
}

/// Register request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Reset password request
#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
}

/// Successful action: `{success: true, redirectTo}`
///
/// Failures use the kernel error envelope
/// `{success: false, error: {code, message, status}}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

impl ActionResponse {
    pub fn redirect(target: impl Into<String>) -> Self {
        Self {
            success: true,
            redirect_to: Some(target.into()),
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// Session set response
#[derive(Debug, Clone, Serialize)]
pub struct SessionSetResponse {
    pub message: &'static str,
}

/// Session status response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRef>,
}

impl SessionStatusResponse {
    pub fn signed_out() -> Self {
        Self {
            authenticated: false,
            user: None,
        }
    }
}

// ============================================================================
// OAuth
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthStartQuery {
    pub redirect_to: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub redirect_to: Option<String>,
    pub error: Option<String>,
    #[serde(rename = "error_description")]
    pub error_description: Option<String>,
}

// ============================================================================
// Pages
// ============================================================================

/// Query flags understood by the login page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginPageQuery {
    pub registered: Option<String>,
    pub reset: Option<String>,
    pub error: Option<String>,
}
