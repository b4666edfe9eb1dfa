//! Auth Middleware
//!
//! - [`route_guard`]: request-level classification of every page and API
//!   path (Public / AuthOnly / Protected)
//! - [`require_dashboard_session`]: independent check at the dashboard
//!   boundary that exposes the session to handlers
//!
//! Both fail closed: if the session cannot be validated the user is
//! treated as signed out.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use platform::cookie::rewrite_request_cookies;

use crate::application::CheckSessionUseCase;
use crate::domain::entity::{ResolvedSession, UserRef};
use crate::domain::repository::SessionStore;
use crate::domain::value_object::RouteClass;
use crate::domain::value_object::route::login_redirect_location;
use crate::presentation::cookies::{
    cleared_session_cookies, session_cookies, session_tokens, with_cookies,
};
use crate::presentation::handlers::AuthAppState;

/// Session of the current request, inserted by the dashboard guard
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub user: UserRef,
    pub access_token: String,
}

fn refreshed_cookies<S>(state: &AuthAppState<S>, resolved: &ResolvedSession) -> Vec<String>
where
    S: SessionStore + Send + Sync + 'static,
{
    resolved
        .refreshed
        .as_ref()
        .map(|session| session_cookies(&state.config, session))
        .unwrap_or_default()
}

/// Sign-out side effect of a failed session check
async fn force_sign_out<S>(state: &AuthAppState<S>, access_token: Option<&str>)
where
    S: SessionStore + Send + Sync + 'static,
{
    let Some(token) = access_token else {
        return;
    };

    if let Err(e) = state.store.sign_out(token).await {
        tracing::debug!(error = %e, "Forced sign out failed");
    }
}

/// Route Guard
///
/// Runs before page code for every path the matcher covers. Refreshed
/// session cookies are written on pass-through and redirect responses
/// alike, and the request `Cookie` header is rewritten so downstream
/// handlers see the new tokens.
pub async fn route_guard<S>(
    State(state): State<AuthAppState<S>>,
    mut req: Request,
    next: Next,
) -> Response
where
    S: SessionStore + Send + Sync + 'static,
{
    let config = state.config.clone();
    let path = req.uri().path().to_string();

    if !config.routes.guard_applies(&path) {
        return next.run(req).await;
    }

    let tokens = session_tokens(req.headers(), &config);
    let class = config.routes.classify(&path);
    let use_case = CheckSessionUseCase::new(state.store.clone());

    match use_case.execute(&tokens).await {
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "Session check failed, signing out");
            force_sign_out(&state, tokens.access_token.as_deref()).await;
            with_cookies(
                Redirect::temporary(&config.login_route),
                &cleared_session_cookies(&config),
            )
        }
        Ok(Some(resolved)) => {
            let cookies = refreshed_cookies(&state, &resolved);

            if class == RouteClass::AuthOnly {
                tracing::debug!(path = %path, "Signed-in user sent to landing route");
                return with_cookies(Redirect::temporary(&config.landing_route), &cookies);
            }

            if let Some(session) = &resolved.refreshed {
                rewrite_request_cookies(
                    req.headers_mut(),
                    &[
                        (config.access_cookie_name.as_str(), session.access_token.as_str()),
                        (config.refresh_cookie_name.as_str(), session.refresh_token.as_str()),
                    ],
                );
            }

            with_cookies(next.run(req).await, &cookies)
        }
        Ok(None) => match class {
            RouteClass::Public | RouteClass::AuthOnly => next.run(req).await,
            RouteClass::Protected => {
                tracing::debug!(path = %path, "Unauthenticated request to protected route");
                Redirect::temporary(&login_redirect_location(&config.login_route, &path))
                    .into_response()
            }
        },
    }
}

/// Dashboard Layout Guard
///
/// Checked on every request, independent of [`route_guard`]. Without a
/// valid session nothing below this layer runs.
pub async fn require_dashboard_session<S>(
    State(state): State<AuthAppState<S>>,
    mut req: Request,
    next: Next,
) -> Response
where
    S: SessionStore + Send + Sync + 'static,
{
    let config = state.config.clone();
    let tokens = session_tokens(req.headers(), &config);
    let use_case = CheckSessionUseCase::new(state.store.clone());

    let resolved = match use_case.execute(&tokens).await {
        Ok(Some(resolved)) => resolved,
        Ok(None) => return Redirect::temporary(&config.login_route).into_response(),
        Err(e) => {
            e.log();
            return with_cookies(
                Redirect::temporary(&config.login_route),
                &cleared_session_cookies(&config),
            );
        }
    };

    let cookies = refreshed_cookies(&state, &resolved);
    req.extensions_mut().insert(CurrentSession {
        user: resolved.user,
        access_token: resolved.access_token,
    });

    with_cookies(next.run(req).await, &cookies)
}
