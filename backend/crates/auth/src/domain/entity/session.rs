//! Session Entities
//!
//! A [`Session`] is issued by the hosted backend and never fabricated
//! locally; this crate only stores, forwards and refreshes it.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use serde::{Deserialize, Serialize};

/// Lightweight identity projection of the signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
    #[serde(default)]
    pub email_confirmed_at: Option<DateTime<Utc>>,
}

impl UserRef {
    pub fn is_confirmed(&self) -> bool {
        self.email_confirmed_at.is_some()
    }
}

/// Credential bundle returned by the token endpoint
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Unix seconds
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub user: Option<UserRef>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    /// Absolute expiry, derived from `expires_in` when `expires_at` is absent
    pub fn expiry(&self, issued_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match (self.expires_at, self.expires_in) {
            (Some(at), _) => DateTime::from_timestamp(at, 0),
            (None, Some(secs)) => Some(issued_at + chrono::Duration::seconds(secs)),
            (None, None) => None,
        }
    }

    /// True when the access token expires within `margin` of `now`
    ///
    /// Sessions without any expiry information are never considered stale.
    pub fn expires_within(&self, now: DateTime<Utc>, margin: chrono::Duration) -> bool {
        self.expires_at
            .and_then(|at| DateTime::from_timestamp(at, 0))
            .is_some_and(|at| at - now <= margin)
    }

    /// Fill in `expires_at` from `expires_in`
    pub fn stamped(mut self, now: DateTime<Utc>) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = self.expiry(now).map(|at| at.timestamp());
        }
        self
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user.as_ref().map(|u| u.id))
            .finish()
    }
}

/// Session validated for the current request
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    pub user: UserRef,
    /// Access token valid for this request (the refreshed one if rotated)
    pub access_token: String,
    /// New tokens when the session was refreshed; cookies must be rewritten
    pub refreshed: Option<Session>,
}

impl ResolvedSession {
    pub fn was_refreshed(&self) -> bool {
        self.refreshed.is_some()
    }
}

/// Result of a sign-up request
#[derive(Debug, Clone)]
pub enum SignUpOutcome {
    /// Backend auto-confirmed the account and issued a session
    SignedIn(Session),
    /// Confirmation email sent; no session until the user confirms
    ConfirmationRequired(UserRef),
}

/// Kind of session change delivered to listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthChangeEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

/// Session-changed notification
#[derive(Debug, Clone)]
pub struct AuthChange {
    pub event: AuthChangeEvent,
    pub session: Option<Session>,
}

impl AuthChange {
    pub fn user(&self) -> Option<&UserRef> {
        self.session.as_ref().and_then(|s| s.user.as_ref())
    }
}
