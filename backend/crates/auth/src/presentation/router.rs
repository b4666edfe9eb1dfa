//! Auth Routers

use axum::{
    Router,
    routing::{get, post},
};

use crate::domain::repository::SessionStore;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::pages;

/// Auth actions, mounted at `/api/auth`
pub fn auth_router<S>(state: AuthAppState<S>) -> Router
where
    S: SessionStore + Send + Sync + 'static,
{
    Router::new()
        .route("/login", post(handlers::login::<S>))
        .route("/logout", post(handlers::logout::<S>))
        .route("/register", post(handlers::register::<S>))
        .route("/reset-password", post(handlers::reset_password::<S>))
        .route("/session", post(handlers::set_session::<S>))
        .route("/status", get(handlers::session_status::<S>))
        .with_state(state)
}

/// OAuth round trip, mounted at `/auth`
pub fn callback_router<S>(state: AuthAppState<S>) -> Router
where
    S: SessionStore + Send + Sync + 'static,
{
    Router::new()
        .route("/oauth/{provider}", get(handlers::oauth_start::<S>))
        .route("/callback", get(handlers::oauth_callback::<S>))
        .with_state(state)
}

/// Public and sign-in pages
pub fn pages_router() -> Router {
    Router::new()
        .route("/", get(pages::landing_page))
        .route("/login", get(pages::login_page))
        .route("/register", get(pages::register_page))
        .route("/reset-password", get(pages::reset_password_page))
}
