//! Sign Up Use Case

use std::sync::Arc;

use crate::domain::entity::SignUpOutcome;
use crate::domain::repository::SessionStore;
use crate::domain::value_object::Credentials;
use crate::error::AuthResult;

/// Sign up input
pub struct SignUpInput {
    pub email: String,
    pub password: String,
    /// Link target for the confirmation email
    pub email_redirect_to: Option<String>,
}

/// Sign up use case
pub struct SignUpUseCase<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    store: Arc<S>,
}

impl<S> SignUpUseCase<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutcome> {
        let credentials = Credentials::for_sign_up(&input.email, input.password)?;

        let outcome = self
            .store
            .sign_up(&credentials, input.email_redirect_to.as_deref())
            .await?;

        match &outcome {
            SignUpOutcome::SignedIn(_) => {
                tracing::info!(email_domain = credentials.email.domain(), "User registered")
            }
            SignUpOutcome::ConfirmationRequired(user) => {
                tracing::info!(user_id = %user.id, "User registered, awaiting confirmation")
            }
        }

        Ok(outcome)
    }
}
