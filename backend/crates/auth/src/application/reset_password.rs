//! Reset Password Use Case

use std::sync::Arc;

use crate::domain::repository::SessionStore;
use crate::domain::value_object::Email;
use crate::error::AuthResult;

/// Reset password use case
pub struct ResetPasswordUseCase<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    store: Arc<S>,
}

impl<S> ResetPasswordUseCase<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, email: &str, redirect_to: Option<&str>) -> AuthResult<()> {
        let email = Email::new(email)?;
        self.store.reset_password_for_email(&email, redirect_to).await?;
        tracing::info!(email_domain = email.domain(), "Password recovery requested");
        Ok(())
    }
}
