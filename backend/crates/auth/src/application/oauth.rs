//! OAuth (PKCE) Use Case
//!
//! `start` produces the provider URL and the verifier the browser must
//! keep in a cookie; `finish` trades the returned code for a session.

use std::sync::Arc;

use platform::crypto::Pkce;

use crate::domain::entity::Session;
use crate::domain::repository::SessionStore;
use crate::domain::value_object::OAuthProvider;
use crate::error::{AuthError, AuthResult};

pub struct OAuthStart {
    pub authorize_url: String,
    pub code_verifier: String,
}

/// OAuth use case
pub struct OAuthUseCase<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    store: Arc<S>,
}

impl<S> OAuthUseCase<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn start(&self, provider: OAuthProvider, callback_url: &str) -> AuthResult<OAuthStart> {
        let pkce = Pkce::generate();
        let authorize_url = self
            .store
            .authorize_url(provider, callback_url, &pkce.challenge)?;

        tracing::debug!(%provider, "OAuth flow started");

        Ok(OAuthStart {
            authorize_url,
            code_verifier: pkce.verifier,
        })
    }

    pub async fn finish(&self, auth_code: &str, code_verifier: Option<&str>) -> AuthResult<Session> {
        let code_verifier = code_verifier.ok_or_else(|| {
            AuthError::InvalidInput("OAuth verifier missing or expired".to_string())
        })?;

        if auth_code.is_empty() {
            return Err(AuthError::InvalidInput("OAuth code missing".to_string()));
        }

        let session = self
            .store
            .exchange_code_for_session(auth_code, code_verifier)
            .await?;

        if let Some(user) = &session.user {
            tracing::info!(user_id = %user.id, "User signed in with OAuth");
        }

        Ok(session)
    }
}
