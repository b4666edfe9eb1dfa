//! Sign Out Use Case

use std::sync::Arc;

use crate::domain::repository::SessionStore;
use crate::error::{AuthError, AuthResult};

/// Sign out use case
pub struct SignOutUseCase<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    store: Arc<S>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Revoke the backend session
    ///
    /// A token the backend no longer recognizes is already signed out, so
    /// `SessionInvalid` is not an error here.
    pub async fn execute(&self, access_token: Option<&str>) -> AuthResult<()> {
        let Some(access_token) = access_token else {
            return Ok(());
        };

        match self.store.sign_out(access_token).await {
            Ok(()) => {
                tracing::info!("User signed out");
                Ok(())
            }
            Err(AuthError::SessionInvalid) => {
                tracing::debug!("Sign out with an already invalid session");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
