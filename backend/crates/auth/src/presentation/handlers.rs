//! HTTP Handlers

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;
use url::form_urlencoded;

use platform::cookie::extract_cookie;

use crate::application::config::AuthConfig;
use crate::application::{
    CheckSessionUseCase, OAuthUseCase, ResetPasswordUseCase, SetSessionInput, SetSessionUseCase,
    SignInInput, SignInUseCase, SignOutUseCase, SignUpInput, SignUpUseCase,
};
use crate::domain::entity::SignUpOutcome;
use crate::domain::repository::SessionStore;
use crate::domain::value_object::OAuthProvider;
use crate::domain::value_object::route::{REDIRECT_TO_PARAM, safe_redirect_target};
use crate::error::{AuthError, AuthResult};
use crate::presentation::cookies::{
    cleared_session_cookies, session_cookies, session_tokens, with_cookies,
};
use crate::presentation::dto::{
    ActionResponse, LoginRequest, OAuthCallbackQuery, OAuthStartQuery, RegisterRequest,
    ResetPasswordRequest, SessionSetResponse, SessionStatusResponse,
};

/// Shared state for auth handlers and guards
pub struct AuthAppState<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    pub store: Arc<S>,
    pub config: Arc<AuthConfig>,
}

impl<S> AuthAppState<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    pub fn new(store: S, config: AuthConfig) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}

// Manual impl: the store itself need not be Clone
impl<S> Clone for AuthAppState<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
        }
    }
}

fn post_login_target(config: &AuthConfig, requested: Option<&str>) -> String {
    safe_redirect_target(requested).unwrap_or_else(|| config.landing_route.clone())
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<S>(
    State(state): State<AuthAppState<S>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Response>
where
    S: SessionStore + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.store.clone());

    let session = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let target = post_login_target(&state.config, req.redirect_to.as_deref());

    Ok(with_cookies(
        Json(ActionResponse::redirect(target)),
        &session_cookies(&state.config, &session),
    ))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/auth/logout
///
/// Cookies are cleared even when the backend call fails.
pub async fn logout<S>(State(state): State<AuthAppState<S>>, headers: HeaderMap) -> Response
where
    S: SessionStore + Send + Sync + 'static,
{
    let tokens = session_tokens(&headers, &state.config);
    let use_case = SignOutUseCase::new(state.store.clone());
    let cleared = cleared_session_cookies(&state.config);

    match use_case.execute(tokens.access_token.as_deref()).await {
        Ok(()) => with_cookies(
            Json(ActionResponse::redirect(state.config.logout_redirect.clone())),
            &cleared,
        ),
        Err(e) => with_cookies(e, &cleared),
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<S>(
    State(state): State<AuthAppState<S>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<Response>
where
    S: SessionStore + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.store.clone());

    let outcome = use_case
        .execute(SignUpInput {
            email: req.email,
            password: req.password,
            email_redirect_to: Some(state.config.site_link(&state.config.login_route)),
        })
        .await?;

    Ok(match outcome {
        SignUpOutcome::SignedIn(session) => with_cookies(
            Json(ActionResponse::redirect(state.config.landing_route.clone())),
            &session_cookies(&state.config, &session),
        ),
        SignUpOutcome::ConfirmationRequired(_) => {
            Json(ActionResponse::redirect(state.config.registered_redirect())).into_response()
        }
    })
}

// ============================================================================
// Reset Password
// ============================================================================

/// POST /api/auth/reset-password
pub async fn reset_password<S>(
    State(state): State<AuthAppState<S>>,
    Json(req): Json<ResetPasswordRequest>,
) -> AuthResult<Json<ActionResponse>>
where
    S: SessionStore + Send + Sync + 'static,
{
    let use_case = ResetPasswordUseCase::new(state.store.clone());
    let redirect_to = state.config.site_link(&state.config.login_route);

    use_case.execute(&req.email, Some(&redirect_to)).await?;

    Ok(Json(ActionResponse::redirect(
        state.config.reset_requested_redirect(),
    )))
}

// ============================================================================
// Session Set
// ============================================================================

/// POST /api/auth/session
///
/// Plain-text errors: 400 "No session provided", 500 "Error setting session".
pub async fn set_session<S>(State(state): State<AuthAppState<S>>, body: Bytes) -> Response
where
    S: SessionStore + Send + Sync + 'static,
{
    let input = serde_json::from_slice::<Option<SetSessionInput>>(&body)
        .ok()
        .flatten();

    let Some(input) = input else {
        return (StatusCode::BAD_REQUEST, "No session provided").into_response();
    };

    let use_case = SetSessionUseCase::new(state.store.clone());

    match use_case.execute(input).await {
        Ok(session) => with_cookies(
            Json(SessionSetResponse {
                message: "Session set successfully",
            }),
            &session_cookies(&state.config, &session),
        ),
        Err(AuthError::InvalidInput(_)) => {
            (StatusCode::BAD_REQUEST, "No session provided").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Error setting session");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error setting session").into_response()
        }
    }
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/auth/status
pub async fn session_status<S>(State(state): State<AuthAppState<S>>, headers: HeaderMap) -> Response
where
    S: SessionStore + Send + Sync + 'static,
{
    let tokens = session_tokens(&headers, &state.config);
    let use_case = CheckSessionUseCase::new(state.store.clone());

    match use_case.execute(&tokens).await {
        Ok(Some(resolved)) => {
            let cookies = resolved
                .refreshed
                .as_ref()
                .map(|session| session_cookies(&state.config, session))
                .unwrap_or_default();

            with_cookies(
                Json(SessionStatusResponse {
                    authenticated: true,
                    user: Some(resolved.user),
                }),
                &cookies,
            )
        }
        Ok(None) => Json(SessionStatusResponse::signed_out()).into_response(),
        Err(e) => {
            e.log();
            with_cookies(
                Json(SessionStatusResponse::signed_out()),
                &cleared_session_cookies(&state.config),
            )
        }
    }
}

// ============================================================================
// OAuth
// ============================================================================

/// GET /auth/oauth/{provider}
pub async fn oauth_start<S>(
    State(state): State<AuthAppState<S>>,
    Path(provider): Path<String>,
    Query(query): Query<OAuthStartQuery>,
) -> AuthResult<Response>
where
    S: SessionStore + Send + Sync + 'static,
{
    let provider: OAuthProvider = provider.parse()?;
    let config = &state.config;

    let next = post_login_target(config, query.redirect_to.as_deref());
    let encoded: String = form_urlencoded::byte_serialize(next.as_bytes()).collect();
    let callback_url = format!(
        "{}?{REDIRECT_TO_PARAM}={encoded}",
        config.site_link(&config.oauth_callback_route)
    );

    let start = OAuthUseCase::new(state.store.clone()).start(provider, &callback_url)?;

    let verifier_cookie = config.cookie.set_cookie(
        &config.verifier_cookie_name,
        &start.code_verifier,
        Some(config.verifier_cookie_ttl.as_secs()),
    );

    Ok(with_cookies(
        Redirect::to(&start.authorize_url),
        &[verifier_cookie],
    ))
}

/// GET /auth/callback
///
/// Failures land on the login page with `error=oauth`.
pub async fn oauth_callback<S>(
    State(state): State<AuthAppState<S>>,
    headers: HeaderMap,
    Query(query): Query<OAuthCallbackQuery>,
) -> Response
where
    S: SessionStore + Send + Sync + 'static,
{
    let config = &state.config;
    let verifier = extract_cookie(&headers, &config.verifier_cookie_name);
    let mut cookies = vec![config.cookie.removal(&config.verifier_cookie_name)];

    if let Some(error) = &query.error {
        tracing::warn!(
            error = %error,
            description = query.error_description.as_deref().unwrap_or_default(),
            "OAuth provider returned an error"
        );
        return with_cookies(Redirect::to(&config.oauth_failed_redirect()), &cookies);
    }

    let use_case = OAuthUseCase::new(state.store.clone());
    let code = query.code.as_deref().unwrap_or_default();

    match use_case.finish(code, verifier.as_deref()).await {
        Ok(session) => {
            cookies.extend(session_cookies(config, &session));
            let target = post_login_target(config, query.redirect_to.as_deref());
            with_cookies(Redirect::to(&target), &cookies)
        }
        Err(e) => {
            e.log();
            with_cookies(Redirect::to(&config.oauth_failed_redirect()), &cookies)
        }
    }
}
