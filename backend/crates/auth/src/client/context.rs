//! Auth Context
//!
//! Holds the tab's [`AuthState`] in a `watch` channel so any number of
//! consumers can read it or wait for it to settle. State moves
//! `Uninitialized -> Loading -> Authenticated | Unauthenticated` and then
//! follows session-changed notifications for as long as the context is
//! mounted.
//!
//! The initial session fetch and the change listener race: whichever
//! settles the state first wins, and a late fetch result never
//! overwrites a state set by a notification.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use super::session_client::{SessionClient, Subscription};
use crate::domain::entity::{AuthState, SignUpOutcome, UserRef};
use crate::domain::repository::SessionStore;
use crate::error::{AuthError, AuthResult};

pub struct AuthContext<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    client: Arc<SessionClient<S>>,
    state: Arc<watch::Sender<AuthState>>,
    mounted: Arc<AtomicBool>,
    /// Bumped on every mount and unmount; fetch results from an older
    /// generation are dropped
    generation: AtomicU64,
    subscription: Mutex<Option<Subscription>>,
}

impl<S> AuthContext<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    pub fn new(client: Arc<SessionClient<S>>) -> Self {
        Self {
            client,
            state: Arc::new(watch::Sender::new(AuthState::Uninitialized)),
            mounted: Arc::new(AtomicBool::new(false)),
            generation: AtomicU64::new(0),
            subscription: Mutex::new(None),
        }
    }

    pub fn client(&self) -> &Arc<SessionClient<S>> {
        &self.client
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Start tracking the session. A second call while mounted does nothing.
    pub async fn mount(&self) {
        if self.mounted.swap(true, Ordering::SeqCst) {
            return;
        }
        self.generation.fetch_add(1, Ordering::SeqCst);

        self.state.send_replace(AuthState::Loading);
        self.subscribe_to_changes();
        self.initialize().await;
    }

    /// Resolve the initial state from the stored session
    ///
    /// Failures settle to `Unauthenticated`; the state never stays `Loading`.
    pub async fn initialize(&self) {
        let generation = self.generation.load(Ordering::SeqCst);
        let result = self.client.get_session().await;

        if !self.mounted.load(Ordering::SeqCst)
            || self.generation.load(Ordering::SeqCst) != generation
        {
            tracing::debug!("Auth context unmounted; discarding initial session");
            return;
        }

        let next = match result {
            Ok(session) => AuthState::from_user(session.and_then(|s| s.user)),
            Err(e) => {
                tracing::warn!(error = %e, "Initial session fetch failed");
                AuthState::Unauthenticated
            }
        };

        self.state.send_if_modified(|current| {
            if current.is_settled() {
                return false;
            }
            *current = next;
            true
        });
    }

    /// Register the session-changed listener, replacing any previous one
    pub fn subscribe_to_changes(&self) {
        let state = Arc::clone(&self.state);
        let mounted = Arc::clone(&self.mounted);

        let subscription = self.client.on_auth_state_change(move |change| {
            if !mounted.load(Ordering::SeqCst) {
                return;
            }
            state.send_replace(AuthState::from_user(change.user().cloned()));
        });

        let previous = self
            .subscription
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .replace(subscription);
        drop(previous);
    }

    /// Stop tracking; in-flight results are discarded
    pub fn unmount(&self) {
        if self.mounted.swap(false, Ordering::SeqCst) {
            self.generation.fetch_add(1, Ordering::SeqCst);
        }

        let subscription = self
            .subscription
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        drop(subscription);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    // ========================================================================
    // State
    // ========================================================================

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn user(&self) -> Option<UserRef> {
        self.state.borrow().user().cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// Wait until the state is Authenticated or Unauthenticated
    pub async fn ready(&self) -> AuthState {
        let mut rx = self.state.subscribe();
        match rx.wait_for(AuthState::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    // ========================================================================
    // Operations
    // ========================================================================

    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult<UserRef> {
        let session = self.client.sign_in_with_password(email, password).await?;
        let user = session.user.ok_or(AuthError::NoSession)?;

        if self.is_mounted() {
            self.state.send_replace(AuthState::Authenticated(user.clone()));
        }
        Ok(user)
    }

    /// State follows the session-changed notification, if any
    pub async fn sign_up(&self, email: &str, password: &str) -> AuthResult<SignUpOutcome> {
        self.client.sign_up(email, password).await
    }

    pub async fn sign_out(&self) -> AuthResult<()> {
        self.client.sign_out().await
    }

    pub async fn reset_password(&self, email: &str) -> AuthResult<()> {
        self.client.reset_password_for_email(email).await
    }
}

impl<S> Drop for AuthContext<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    fn drop(&mut self) {
        self.unmount();
    }
}
