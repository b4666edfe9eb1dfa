//! In-Memory Session Store
//!
//! Behaves like the hosted identity service closely enough to drive the
//! guards and forms without a network: password grants, email
//! confirmation, token rotation and PKCE code exchange. Also offers knobs
//! to simulate an outage, latency and token expiry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use kernel::id::UserId;
use platform::crypto::{Pkce, random_token};
use url::Url;

use crate::domain::entity::{Session, SignUpOutcome, UserRef};
use crate::domain::repository::SessionStore;
use crate::domain::value_object::{Credentials, Email, OAuthProvider};
use crate::error::{AuthError, AuthResult};

const ACCESS_TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Clone)]
struct Account {
    user: UserRef,
    password: String,
}

#[derive(Debug, Clone)]
struct PendingCode {
    email: String,
    code_challenge: String,
}

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<String, Account>,
    /// access token -> email
    access_tokens: HashMap<String, String>,
    /// refresh token -> email
    refresh_tokens: HashMap<String, String>,
    pending_codes: HashMap<String, PendingCode>,
    recovery_requests: Vec<String>,
}

/// In-process Session Store
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    state: Mutex<State>,
    require_confirmation: bool,
    latency: Option<Duration>,
    unavailable: AtomicBool,
    sign_in_calls: AtomicUsize,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign-ups stay unconfirmed until [`confirm`](Self::confirm) is called
    pub fn with_email_confirmation(mut self) -> Self {
        self.require_confirmation = true;
        self
    }

    /// Delay every sign-in to keep requests in flight
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register an account directly
    pub fn add_user(&self, email: &str, password: &str, confirmed: bool) -> UserRef {
        let user = UserRef {
            id: UserId::new(),
            email: Some(email.to_lowercase()),
            user_metadata: serde_json::Value::Object(Default::default()),
            email_confirmed_at: confirmed.then(Utc::now),
        };

        self.lock().accounts.insert(
            email.to_lowercase(),
            Account {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        user
    }

    /// Simulate the user clicking the confirmation link
    pub fn confirm(&self, email: &str) -> bool {
        match self.lock().accounts.get_mut(&email.to_lowercase()) {
            Some(account) => {
                account.user.email_confirmed_at = Some(Utc::now());
                true
            }
            None => false,
        }
    }

    /// Issue a session without a password grant
    pub fn issue_session(&self, email: &str) -> Option<Session> {
        let mut state = self.lock();
        let user = state.accounts.get(&email.to_lowercase())?.user.clone();
        Some(Self::new_session(&mut state, user))
    }

    /// Invalidate an access token as if it had expired
    pub fn expire_access_token(&self, access_token: &str) {
        self.lock().access_tokens.remove(access_token);
    }

    /// Invalidate a refresh token
    pub fn revoke_refresh_token(&self, refresh_token: &str) {
        self.lock().refresh_tokens.remove(refresh_token);
    }

    /// Make every call fail with a network error
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn sign_in_calls(&self) -> usize {
        self.sign_in_calls.load(Ordering::SeqCst)
    }

    pub fn active_sessions(&self) -> usize {
        self.lock().access_tokens.len()
    }

    pub fn recovery_requests(&self) -> Vec<String> {
        self.lock().recovery_requests.clone()
    }

    /// Simulate the provider redirecting back with `code`
    pub fn register_oauth_code(&self, code: &str, code_challenge: &str, email: &str) {
        let email = email.to_lowercase();
        let mut state = self.lock();

        if !state.accounts.contains_key(&email) {
            let user = UserRef {
                id: UserId::new(),
                email: Some(email.clone()),
                user_metadata: serde_json::Value::Object(Default::default()),
                email_confirmed_at: Some(Utc::now()),
            };
            state.accounts.insert(
                email.clone(),
                Account {
                    user,
                    password: random_token(16),
                },
            );
        }

        state.pending_codes.insert(
            code.to_string(),
            PendingCode {
                email,
                code_challenge: code_challenge.to_string(),
            },
        );
    }

    fn check_available(&self) -> AuthResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AuthError::Network("connection refused".to_string()));
        }
        Ok(())
    }

    fn new_session(state: &mut State, user: UserRef) -> Session {
        let access_token = random_token(24);
        let refresh_token = random_token(24);
        let email = user.email.clone().unwrap_or_default();

        state.access_tokens.insert(access_token.clone(), email.clone());
        state.refresh_tokens.insert(refresh_token.clone(), email);

        Session {
            access_token,
            refresh_token,
            expires_in: Some(ACCESS_TOKEN_TTL_SECS),
            expires_at: Some(Utc::now().timestamp() + ACCESS_TOKEN_TTL_SECS),
            token_type: "bearer".to_string(),
            user: Some(user),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> AuthResult<Option<Session>> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.check_available()?;

        let mut state = self.lock();
        let account = state
            .accounts
            .get(credentials.email.as_str())
            .filter(|account| account.password == credentials.password.expose_secret())
            .cloned()
            .ok_or_else(|| AuthError::InvalidCredentials("Invalid login credentials".to_string()))?;

        if !account.user.is_confirmed() {
            return Err(AuthError::EmailNotConfirmed);
        }

        Ok(Some(Self::new_session(&mut state, account.user)))
    }

    async fn sign_up(
        &self,
        credentials: &Credentials,
        _email_redirect_to: Option<&str>,
    ) -> AuthResult<SignUpOutcome> {
        self.check_available()?;

        let email = credentials.email.as_str();
        if self.lock().accounts.contains_key(email) {
            return Err(AuthError::UserAlreadyRegistered);
        }

        let user = self.add_user(
            email,
            credentials.password.expose_secret(),
            !self.require_confirmation,
        );

        if self.require_confirmation {
            return Ok(SignUpOutcome::ConfirmationRequired(user));
        }

        let mut state = self.lock();
        Ok(SignUpOutcome::SignedIn(Self::new_session(&mut state, user)))
    }

    async fn sign_out(&self, access_token: &str) -> AuthResult<()> {
        self.check_available()?;

        let mut state = self.lock();
        let email = state
            .access_tokens
            .remove(access_token)
            .ok_or(AuthError::SessionInvalid)?;

        // global scope: every session of the user ends
        state.access_tokens.retain(|_, owner| *owner != email);
        state.refresh_tokens.retain(|_, owner| *owner != email);
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> AuthResult<UserRef> {
        self.check_available()?;

        let state = self.lock();
        state
            .access_tokens
            .get(access_token)
            .and_then(|email| state.accounts.get(email))
            .map(|account| account.user.clone())
            .ok_or(AuthError::SessionInvalid)
    }

    async fn refresh_session(&self, refresh_token: &str) -> AuthResult<Session> {
        self.check_available()?;

        let mut state = self.lock();
        let email = state
            .refresh_tokens
            .remove(refresh_token)
            .ok_or(AuthError::SessionInvalid)?;
        let user = state
            .accounts
            .get(&email)
            .map(|account| account.user.clone())
            .ok_or(AuthError::SessionInvalid)?;

        Ok(Self::new_session(&mut state, user))
    }

    async fn reset_password_for_email(
        &self,
        email: &Email,
        _redirect_to: Option<&str>,
    ) -> AuthResult<()> {
        self.check_available()?;
        self.lock().recovery_requests.push(email.to_string());
        Ok(())
    }

    async fn exchange_code_for_session(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> AuthResult<Session> {
        self.check_available()?;

        let mut state = self.lock();
        let pending = state
            .pending_codes
            .remove(auth_code)
            .ok_or_else(|| AuthError::InvalidCredentials("invalid flow state".to_string()))?;

        if Pkce::from_verifier(code_verifier.to_string()).challenge != pending.code_challenge {
            return Err(AuthError::InvalidCredentials(
                "code challenge does not match".to_string(),
            ));
        }

        let user = state
            .accounts
            .get(&pending.email)
            .map(|account| account.user.clone())
            .ok_or(AuthError::SessionInvalid)?;

        Ok(Self::new_session(&mut state, user))
    }

    fn authorize_url(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
        code_challenge: &str,
    ) -> AuthResult<String> {
        let url = Url::parse_with_params(
            "http://identity.invalid/authorize",
            &[
                ("provider", provider.as_str()),
                ("redirect_to", redirect_to),
                ("code_challenge", code_challenge),
            ],
        )
        .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(url.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials::new(email, password.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_sign_in_and_validate() {
        let store = InMemorySessionStore::new();
        let user = store.add_user("elder@example.com", "walking-123", true);

        let session = store
            .sign_in_with_password(&credentials("elder@example.com", "walking-123"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(store.get_user(&session.access_token).await.unwrap().id, user.id);
        assert_eq!(store.sign_in_calls(), 1);
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let store = InMemorySessionStore::new();
        store.add_user("elder@example.com", "walking-123", true);

        let err = store
            .sign_in_with_password(&credentials("elder@example.com", "nope"))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials("Invalid login credentials".into()));
    }

    #[tokio::test]
    async fn test_refresh_rotates_tokens() {
        let store = InMemorySessionStore::new();
        store.add_user("elder@example.com", "walking-123", true);
        let session = store.issue_session("elder@example.com").unwrap();

        let refreshed = store.refresh_session(&session.refresh_token).await.unwrap();
        assert_ne!(refreshed.access_token, session.access_token);

        // old refresh token is consumed
        assert_eq!(
            store.refresh_session(&session.refresh_token).await.unwrap_err(),
            AuthError::SessionInvalid
        );
    }

    #[tokio::test]
    async fn test_sign_out_ends_all_sessions() {
        let store = InMemorySessionStore::new();
        store.add_user("elder@example.com", "walking-123", true);
        let first = store.issue_session("elder@example.com").unwrap();
        let second = store.issue_session("elder@example.com").unwrap();

        store.sign_out(&first.access_token).await.unwrap();

        assert_eq!(store.active_sessions(), 0);
        assert!(store.get_user(&second.access_token).await.is_err());
    }

    #[tokio::test]
    async fn test_unavailable() {
        let store = InMemorySessionStore::new();
        store.set_unavailable(true);
        assert!(matches!(
            store.get_user("any").await,
            Err(AuthError::Network(_))
        ));
    }

    #[tokio::test]
    async fn test_pkce_exchange() {
        let store = InMemorySessionStore::new();
        let pkce = Pkce::generate();
        store.register_oauth_code("code-1", &pkce.challenge, "family@example.com");

        assert!(store.exchange_code_for_session("code-1", "wrong-verifier").await.is_err());

        store.register_oauth_code("code-2", &pkce.challenge, "family@example.com");
        let session = store
            .exchange_code_for_session("code-2", &pkce.verifier)
            .await
            .unwrap();
        assert_eq!(
            session.user.unwrap().email.as_deref(),
            Some("family@example.com")
        );
    }
}
