//! Client-side navigation seam

use super::context::AuthContext;
use crate::domain::repository::SessionStore;
use crate::error::AuthResult;

/// Where the sidebar sends the user after signing out
pub const LOGOUT_ROUTE: &str = "/login";

/// Router push; implemented by whatever owns the page history
pub trait Navigator: Send + Sync {
    fn push(&self, path: &str);
}

/// Sidebar sign-out: end the session, then go to the login page
///
/// On failure nothing is navigated and the error is handed back for display.
pub async fn sign_out_and_navigate<S, N>(context: &AuthContext<S>, navigator: &N) -> AuthResult<()>
where
    S: SessionStore + Send + Sync + 'static,
    N: Navigator + ?Sized,
{
    if let Err(e) = context.sign_out().await {
        tracing::warn!(error = %e, "Sign-out failed");
        return Err(e);
    }

    navigator.push(LOGOUT_ROUTE);
    Ok(())
}
