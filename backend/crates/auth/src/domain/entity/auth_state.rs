//! Auth State
//!
//! Tagged state held by the per-tab auth context.

use super::session::UserRef;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthState {
    #[default]
    Uninitialized,
    /// Initial session fetch in flight
    Loading,
    Authenticated(UserRef),
    Unauthenticated,
}

impl AuthState {
    /// Authenticated or Unauthenticated
    pub fn is_settled(&self) -> bool {
        matches!(self, AuthState::Authenticated(_) | AuthState::Unauthenticated)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Loading)
    }

    pub fn user(&self) -> Option<&UserRef> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn from_user(user: Option<UserRef>) -> Self {
        user.map_or(AuthState::Unauthenticated, AuthState::Authenticated)
    }
}
