//! Check Session Use Case
//!
//! Resolves the session carried by a request's cookies against the
//! backend, refreshing it when the access token has expired.

use std::sync::Arc;

use crate::domain::entity::ResolvedSession;
use crate::domain::repository::SessionStore;
use crate::error::{AuthError, AuthResult};

/// Tokens read from request cookies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionTokens {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl SessionTokens {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// Check session use case
pub struct CheckSessionUseCase<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    store: Arc<S>,
}

impl<S> CheckSessionUseCase<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// `Ok(None)`: no session cookie. `Err`: the session could not be
    /// validated and must be treated as signed out.
    pub async fn execute(&self, tokens: &SessionTokens) -> AuthResult<Option<ResolvedSession>> {
        let Some(access_token) = tokens.access_token.as_deref() else {
            return Ok(None);
        };

        match self.store.get_user(access_token).await {
            Ok(user) => Ok(Some(ResolvedSession {
                user,
                access_token: access_token.to_string(),
                refreshed: None,
            })),
            Err(AuthError::SessionInvalid) => match tokens.refresh_token.as_deref() {
                Some(refresh_token) => self.refresh(refresh_token).await.map(Some),
                None => Err(AuthError::SessionInvalid),
            },
            Err(e) => Err(e),
        }
    }

    async fn refresh(&self, refresh_token: &str) -> AuthResult<ResolvedSession> {
        let session = self.store.refresh_session(refresh_token).await?;

        let user = match session.user.clone() {
            Some(user) => user,
            None => self.store.get_user(&session.access_token).await?,
        };

        tracing::debug!(user_id = %user.id, "Session refreshed");

        Ok(ResolvedSession {
            user,
            access_token: session.access_token.clone(),
            refreshed: Some(session),
        })
    }
}
