//! Sign In Use Case
//!
//! Password grant against the Session Store.

use std::sync::Arc;

use crate::domain::entity::Session;
use crate::domain::repository::SessionStore;
use crate::domain::value_object::Credentials;
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in use case
pub struct SignInUseCase<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    store: Arc<S>,
}

impl<S> SignInUseCase<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<Session> {
        let credentials = Credentials::new(&input.email, input.password)?;

        let session = self
            .store
            .sign_in_with_password(&credentials)
            .await?
            .ok_or(AuthError::NoSession)?;

        match &session.user {
            Some(user) => tracing::info!(user_id = %user.id, "User signed in"),
            None => tracing::info!("User signed in"),
        }

        Ok(session)
    }
}
