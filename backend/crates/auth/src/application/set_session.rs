//! Set Session Use Case
//!
//! Installs a session obtained client-side (e.g. after an email link)
//! into server cookies. The tokens are validated with the backend first.

use std::sync::Arc;

use serde::Deserialize;

use crate::application::check_session::{CheckSessionUseCase, SessionTokens};
use crate::domain::entity::Session;
use crate::domain::repository::SessionStore;
use crate::error::{AuthError, AuthResult};

/// Serialized session as posted by the client
#[derive(Deserialize)]
pub struct SetSessionInput {
    pub access_token: String,
    pub refresh_token: String,
}

/// Set session use case
pub struct SetSessionUseCase<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    store: Arc<S>,
}

impl<S> SetSessionUseCase<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns the session to write into cookies
    pub async fn execute(&self, input: SetSessionInput) -> AuthResult<Session> {
        if input.access_token.is_empty() || input.refresh_token.is_empty() {
            return Err(AuthError::InvalidInput("No session provided".to_string()));
        }

        let tokens = SessionTokens {
            access_token: Some(input.access_token.clone()),
            refresh_token: Some(input.refresh_token.clone()),
        };

        let resolved = CheckSessionUseCase::new(self.store.clone())
            .execute(&tokens)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        Ok(resolved.refreshed.unwrap_or(Session {
            access_token: input.access_token,
            refresh_token: input.refresh_token,
            expires_in: None,
            expires_at: None,
            token_type: "bearer".to_string(),
            user: Some(resolved.user),
        }))
    }
}
