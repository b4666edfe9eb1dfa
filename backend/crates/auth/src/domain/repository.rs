//! Repository Traits
//!
//! The Session Store is the hosted identity service. It owns every
//! session; implementations live in the infrastructure layer and must
//! convert backend failures into [`AuthError`](crate::error::AuthError)
//! before returning.

use crate::domain::entity::{Session, SignUpOutcome, UserRef};
use crate::domain::value_object::{Credentials, Email, OAuthProvider};
use crate::error::AuthResult;

/// Session Store trait
#[trait_variant::make(SessionStore: Send)]
pub trait LocalSessionStore {
    /// Password grant. `Ok(None)` means the credentials were accepted but
    /// no session was issued.
    async fn sign_in_with_password(&self, credentials: &Credentials)
    -> AuthResult<Option<Session>>;

    /// Create an account; confirmation emails link back to `email_redirect_to`
    async fn sign_up(
        &self,
        credentials: &Credentials,
        email_redirect_to: Option<&str>,
    ) -> AuthResult<SignUpOutcome>;

    /// Revoke the session behind `access_token`
    async fn sign_out(&self, access_token: &str) -> AuthResult<()>;

    /// Validate an access token; `SessionInvalid` when rejected
    async fn get_user(&self, access_token: &str) -> AuthResult<UserRef>;

    /// Rotate tokens; the old refresh token is consumed
    async fn refresh_session(&self, refresh_token: &str) -> AuthResult<Session>;

    /// Send a recovery email (succeeds for unknown addresses too)
    async fn reset_password_for_email(
        &self,
        email: &Email,
        redirect_to: Option<&str>,
    ) -> AuthResult<()>;

    /// Finish a PKCE OAuth flow
    async fn exchange_code_for_session(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> AuthResult<Session>;

    /// Provider authorization URL the browser is sent to
    fn authorize_url(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
        code_challenge: &str,
    ) -> AuthResult<String>;
}
