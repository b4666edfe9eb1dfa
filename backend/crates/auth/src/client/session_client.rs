//! Session Client
//!
//! Owns the tab's copy of the session. It is the only writer of the
//! session storage key and the only source of [`AuthChange`]
//! notifications. Listeners are registered explicitly and removed when
//! their [`Subscription`] is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use chrono::Utc;

use super::storage::ClientStorage;
use crate::domain::entity::{AuthChange, AuthChangeEvent, Session, SignUpOutcome};
use crate::domain::repository::SessionStore;
use crate::domain::value_object::{Credentials, Email};
use crate::error::{AuthError, AuthResult};

/// Storage key of the persisted session
pub const AUTH_STORAGE_KEY: &str = "gospl-auth-token";

/// Sessions this close to expiry are refreshed before use
const REFRESH_MARGIN_SECS: i64 = 10;

type Listener = Arc<dyn Fn(&AuthChange) + Send + Sync>;

#[derive(Default)]
struct ListenerRegistry {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(u64, Listener)>>,
}

impl ListenerRegistry {
    fn lock(&self) -> MutexGuard<'_, Vec<(u64, Listener)>> {
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn add(&self, listener: Listener) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push((id, listener));
        id
    }

    fn remove(&self, id: u64) {
        self.lock().retain(|(listener_id, _)| *listener_id != id);
    }

    fn snapshot(&self) -> Vec<Listener> {
        self.lock().iter().map(|(_, listener)| listener.clone()).collect()
    }
}

/// Listener registration; dropping it unregisters the listener
#[must_use = "dropping a Subscription unregisters its listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<ListenerRegistry>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

pub struct SessionClient<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    store: Arc<S>,
    storage: Arc<dyn ClientStorage>,
    listeners: Arc<ListenerRegistry>,
    email_redirect_to: Option<String>,
}

impl<S> SessionClient<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, storage: Arc<dyn ClientStorage>) -> Self {
        Self {
            store,
            storage,
            listeners: Arc::new(ListenerRegistry::default()),
            email_redirect_to: None,
        }
    }

    /// Link target for confirmation and recovery emails
    pub fn with_email_redirect(mut self, redirect_to: impl Into<String>) -> Self {
        self.email_redirect_to = Some(redirect_to.into());
        self
    }

    // ========================================================================
    // Change notification
    // ========================================================================

    pub fn on_auth_state_change<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&AuthChange) + Send + Sync + 'static,
    {
        let id = self.listeners.add(Arc::new(listener));
        Subscription {
            id,
            registry: Arc::downgrade(&self.listeners),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Deliver to every listener in registration order
    fn notify(&self, event: AuthChangeEvent, session: Option<Session>) {
        let change = AuthChange { event, session };
        tracing::debug!(?event, "Auth state change");

        for listener in self.listeners.snapshot() {
            listener(&change);
        }
    }

    // ========================================================================
    // Storage
    // ========================================================================

    fn load_session(&self) -> AuthResult<Option<Session>> {
        let raw = self
            .storage
            .get_item(AUTH_STORAGE_KEY)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable stored session");
                self.clear();
                Ok(None)
            }
        }
    }

    fn persist(&self, session: &Session) -> AuthResult<()> {
        let raw = serde_json::to_string(session).map_err(|e| AuthError::Internal(e.to_string()))?;
        self.storage
            .set_item(AUTH_STORAGE_KEY, &raw)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    fn clear(&self) {
        if let Err(e) = self.storage.remove_item(AUTH_STORAGE_KEY) {
            tracing::warn!(error = %e, "Stored session not removed");
        }
    }

    fn install(&self, event: AuthChangeEvent, session: Session) -> AuthResult<Session> {
        self.persist(&session)?;
        self.notify(event, Some(session.clone()));
        Ok(session)
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Current session, refreshed first when it is about to expire
    pub async fn get_session(&self) -> AuthResult<Option<Session>> {
        let Some(session) = self.load_session()? else {
            return Ok(None);
        };

        let margin = chrono::Duration::seconds(REFRESH_MARGIN_SECS);
        if !session.expires_within(Utc::now(), margin) {
            return Ok(Some(session));
        }

        match self.store.refresh_session(&session.refresh_token).await {
            Ok(mut refreshed) => {
                if refreshed.user.is_none() {
                    refreshed.user = session.user;
                }
                self.install(AuthChangeEvent::TokenRefreshed, refreshed)
                    .map(Some)
            }
            Err(AuthError::SessionInvalid) => {
                self.clear();
                self.notify(AuthChangeEvent::SignedOut, None);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<Session> {
        let credentials = Credentials::new(email, password.to_string())?;

        let session = self
            .store
            .sign_in_with_password(&credentials)
            .await?
            .ok_or(AuthError::NoSession)?;

        self.install(AuthChangeEvent::SignedIn, session)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> AuthResult<SignUpOutcome> {
        let credentials = Credentials::for_sign_up(email, password.to_string())?;

        let outcome = self
            .store
            .sign_up(&credentials, self.email_redirect_to.as_deref())
            .await?;

        if let SignUpOutcome::SignedIn(session) = &outcome {
            self.install(AuthChangeEvent::SignedIn, session.clone())?;
        }

        Ok(outcome)
    }

    /// Ends the session locally even if the backend call fails
    pub async fn sign_out(&self) -> AuthResult<()> {
        let session = self.load_session().unwrap_or_default();

        let result = match &session {
            Some(session) => self.store.sign_out(&session.access_token).await,
            None => Ok(()),
        };

        self.clear();
        self.notify(AuthChangeEvent::SignedOut, None);

        match result {
            Ok(()) | Err(AuthError::SessionInvalid) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub async fn reset_password_for_email(&self, email: &str) -> AuthResult<()> {
        let email = Email::new(email)?;
        self.store
            .reset_password_for_email(&email, self.email_redirect_to.as_deref())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::storage::MemoryStorage;
    use crate::infra::memory::InMemorySessionStore;
    use std::sync::atomic::AtomicUsize;

    fn client() -> (Arc<InMemorySessionStore>, Arc<MemoryStorage>, SessionClient<InMemorySessionStore>) {
        let store = Arc::new(InMemorySessionStore::new());
        store.add_user("elder@example.com", "walking-123", true);
        let storage = Arc::new(MemoryStorage::new());
        let client = SessionClient::new(store.clone(), storage.clone());
        (store, storage, client)
    }

    #[tokio::test]
    async fn test_sign_in_persists_and_notifies() {
        let (_, storage, client) = client();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let _sub = client.on_auth_state_change(move |change| {
            sink.lock().unwrap().push(change.event);
        });

        client
            .sign_in_with_password("elder@example.com", "walking-123")
            .await
            .unwrap();

        assert!(storage.get_item(AUTH_STORAGE_KEY).unwrap().is_some());
        assert_eq!(*events.lock().unwrap(), vec![AuthChangeEvent::SignedIn]);
    }

    #[tokio::test]
    async fn test_subscription_drop_unregisters() {
        let (_, _, client) = client();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        let sub = client.on_auth_state_change(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(client.listener_count(), 1);

        sub.unsubscribe();
        assert_eq!(client.listener_count(), 0);

        client.sign_out().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_expiring_session_is_refreshed() {
        let (_, storage, client) = client();
        let session = client
            .sign_in_with_password("elder@example.com", "walking-123")
            .await
            .unwrap();

        let mut stale = session.clone();
        stale.expires_at = Some(Utc::now().timestamp() - 1);
        storage
            .set_item(AUTH_STORAGE_KEY, &serde_json::to_string(&stale).unwrap())
            .unwrap();

        let current = client.get_session().await.unwrap().unwrap();
        assert_ne!(current.access_token, session.access_token);
        assert!(current.user.is_some());
    }

    #[tokio::test]
    async fn test_revoked_refresh_token_signs_out() {
        let (store, storage, client) = client();
        let session = client
            .sign_in_with_password("elder@example.com", "walking-123")
            .await
            .unwrap();
        store.revoke_refresh_token(&session.refresh_token);

        let mut stale = session;
        stale.expires_at = Some(Utc::now().timestamp() - 1);
        storage
            .set_item(AUTH_STORAGE_KEY, &serde_json::to_string(&stale).unwrap())
            .unwrap();

        assert!(client.get_session().await.unwrap().is_none());
        assert!(storage.get_item(AUTH_STORAGE_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sign_out_clears_even_when_backend_down() {
        let (store, storage, client) = client();
        client
            .sign_in_with_password("elder@example.com", "walking-123")
            .await
            .unwrap();
        store.set_unavailable(true);

        assert!(matches!(client.sign_out().await, Err(AuthError::Network(_))));
        assert!(storage.get_item(AUTH_STORAGE_KEY).unwrap().is_none());
    }
}
