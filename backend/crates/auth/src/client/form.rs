//! Auth Forms
//!
//! Submission controller shared by the login, registration and
//! password-reset pages. One submission at a time; the error text shown
//! to the user always comes from [`AuthError::user_message`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::context::AuthContext;
use super::navigation::Navigator;
use crate::domain::entity::SignUpOutcome;
use crate::domain::repository::SessionStore;
use crate::domain::value_object::route::safe_redirect_target;
use crate::error::AuthResult;

const DEFAULT_SUCCESS_ROUTE: &str = "/dashboard";
const REGISTERED_ROUTE: &str = "/login?registered=true";
const RESET_REQUESTED_ROUTE: &str = "/login?reset=requested";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Login,
    Register,
    ResetPassword,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Success; the navigator was sent to this path
    Navigated(String),
    /// Failure; the message is also kept as the form error
    Failed(String),
    /// A submission was already in flight
    Ignored,
}

/// Clears the loading flag however the submission ends
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct AuthForm<S, N>
where
    S: SessionStore + Send + Sync + 'static,
    N: Navigator + ?Sized,
{
    kind: FormKind,
    context: Arc<AuthContext<S>>,
    navigator: Arc<N>,
    redirect_to: Option<String>,
    loading: AtomicBool,
    error: Mutex<Option<String>>,
}

impl<S, N> AuthForm<S, N>
where
    S: SessionStore + Send + Sync + 'static,
    N: Navigator + ?Sized,
{
    pub fn new(kind: FormKind, context: Arc<AuthContext<S>>, navigator: Arc<N>) -> Self {
        Self {
            kind,
            context,
            navigator,
            redirect_to: None,
            loading: AtomicBool::new(false),
            error: Mutex::new(None),
        }
    }

    /// Post-login destination from the `redirectTo` query; unsafe values are dropped
    pub fn with_redirect_to(mut self, redirect_to: Option<&str>) -> Self {
        self.redirect_to = safe_redirect_target(redirect_to);
        self
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn error(&self) -> Option<String> {
        self.error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set_error(&self, message: Option<String>) {
        *self
            .error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = message;
    }

    pub async fn submit(&self, email: &str, password: &str) -> SubmitOutcome {
        if self.loading.swap(true, Ordering::SeqCst) {
            tracing::debug!(kind = ?self.kind, "Submission already in flight");
            return SubmitOutcome::Ignored;
        }
        let _guard = LoadingGuard(&self.loading);

        self.set_error(None);

        match self.run(email, password).await {
            Ok(target) => {
                self.navigator.push(&target);
                SubmitOutcome::Navigated(target)
            }
            Err(e) => {
                tracing::debug!(kind = ?self.kind, code = e.code(), "Form submission failed");
                let message = e.user_message();
                self.set_error(Some(message.clone()));
                SubmitOutcome::Failed(message)
            }
        }
    }

    async fn run(&self, email: &str, password: &str) -> AuthResult<String> {
        match self.kind {
            FormKind::Login => {
                self.context.sign_in(email, password).await?;
                Ok(self.success_route())
            }
            FormKind::Register => match self.context.sign_up(email, password).await? {
                SignUpOutcome::SignedIn(_) => Ok(self.success_route()),
                SignUpOutcome::ConfirmationRequired(_) => Ok(REGISTERED_ROUTE.to_string()),
            },
            FormKind::ResetPassword => {
                self.context.reset_password(email).await?;
                Ok(RESET_REQUESTED_ROUTE.to_string())
            }
        }
    }

    fn success_route(&self) -> String {
        self.redirect_to
            .clone()
            .unwrap_or_else(|| DEFAULT_SUCCESS_ROUTE.to_string())
    }
}
