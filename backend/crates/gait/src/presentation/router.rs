//! Dashboard Router

use auth::{AuthAppState, SessionStore, require_dashboard_session};
use axum::middleware::from_fn_with_state;
use axum::{
    Router,
    routing::{get, post},
};

use crate::domain::repository::GaitRepository;
use crate::presentation::handlers::{self, GaitAppState};

/// Dashboard routes behind the Dashboard Layout Guard
///
/// The guard runs for every route here regardless of the request-level
/// Route Guard in front of the whole application.
pub fn dashboard_router<R, S>(state: GaitAppState<R>, auth_state: AuthAppState<S>) -> Router
where
    R: GaitRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    Router::new()
        .route("/dashboard", get(handlers::overview::<R>))
        .route("/dashboard/gait", get(handlers::gait_data::<R>))
        .route("/dashboard/alerts", get(handlers::alerts::<R>))
        .route(
            "/dashboard/alerts/{id}/acknowledge",
            post(handlers::acknowledge_alert::<R>),
        )
        .route("/dashboard/settings", get(handlers::settings::<R>))
        .route_layer(from_fn_with_state(
            auth_state,
            require_dashboard_session::<S>,
        ))
        .with_state(state)
}
