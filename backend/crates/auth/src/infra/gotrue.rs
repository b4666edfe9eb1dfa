//! Hosted Identity API Session Store
//!
//! Speaks the GoTrue REST dialect (`/auth/v1/*`). This is the only place
//! backend error payloads are inspected; each one is classified into an
//! [`AuthError`] before it leaves the module.

use chrono::Utc;
use platform::backend::{BackendClient, BackendError, Method, send_empty, send_json};
use platform::crypto::Pkce;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::domain::entity::{Session, SignUpOutcome, UserRef};
use crate::domain::repository::SessionStore;
use crate::domain::value_object::{Credentials, Email, OAuthProvider};
use crate::error::{AuthError, AuthResult};

/// Session Store backed by the hosted identity API
#[derive(Clone)]
pub struct GoTrueSessionStore {
    client: BackendClient,
}

impl GoTrueSessionStore {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

/// Which kind of call failed; decides how 4xx responses are read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    /// User-submitted credentials or addresses
    Credentials,
    /// Token validation, refresh and revocation
    Session,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorPayload {
    error_code: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

impl ErrorPayload {
    fn text(self) -> Option<String> {
        self.msg
            .or(self.error_description)
            .or(self.message)
            .or(self.error)
    }
}

fn classify(err: BackendError, call: Call) -> AuthError {
    let (status, body) = match err {
        BackendError::Transport(e) => return AuthError::Network(e.to_string()),
        BackendError::Decode(msg) => {
            return AuthError::Internal(format!("Unexpected identity response: {msg}"));
        }
        BackendError::Status { status, body } => (status, body),
    };

    let payload: ErrorPayload = serde_json::from_str(&body).unwrap_or_default();
    let error_code = payload.error_code.clone();
    let message = payload
        .text()
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());

    match error_code.as_deref() {
        Some("email_not_confirmed") => return AuthError::EmailNotConfirmed,
        Some("user_already_exists" | "email_exists") => return AuthError::UserAlreadyRegistered,
        Some("weak_password") => return AuthError::PasswordPolicy(message),
        _ => {}
    }

    // older deployments omit error_code
    match message.as_str() {
        "Email not confirmed" => return AuthError::EmailNotConfirmed,
        "User already registered" => return AuthError::UserAlreadyRegistered,
        _ => {}
    }

    if status.is_server_error() {
        return AuthError::Backend {
            status: status.as_u16(),
            message,
        };
    }

    match call {
        Call::Session => AuthError::SessionInvalid,
        Call::Credentials => AuthError::InvalidCredentials(message),
    }
}

/// Password grant answers with a session or, in exotic setups, something else
#[derive(Deserialize)]
#[serde(untagged)]
enum PasswordGrant {
    Session(Session),
    Other(serde::de::IgnoredAny),
}

/// Sign-up answers with a session (auto-confirm) or the bare user
#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(Session),
    User(UserRef),
}

impl SessionStore for GoTrueSessionStore {
    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> AuthResult<Option<Session>> {
        let request = self
            .client
            .auth(Method::POST, "token?grant_type=password")
            .json(&json!({
                "email": credentials.email.as_str(),
                "password": credentials.password.expose_secret(),
            }));

        let grant: PasswordGrant = send_json(request)
            .await
            .map_err(|e| classify(e, Call::Credentials))?;

        Ok(match grant {
            PasswordGrant::Session(session) if !session.access_token.is_empty() => {
                Some(session.stamped(Utc::now()))
            }
            _ => None,
        })
    }

    async fn sign_up(
        &self,
        credentials: &Credentials,
        email_redirect_to: Option<&str>,
    ) -> AuthResult<SignUpOutcome> {
        let mut request = self.client.auth(Method::POST, "signup").json(&json!({
            "email": credentials.email.as_str(),
            "password": credentials.password.expose_secret(),
        }));
        if let Some(redirect_to) = email_redirect_to {
            request = request.query(&[("redirect_to", redirect_to)]);
        }

        let response: SignUpResponse = send_json(request)
            .await
            .map_err(|e| classify(e, Call::Credentials))?;

        Ok(match response {
            SignUpResponse::Session(session) => SignUpOutcome::SignedIn(session.stamped(Utc::now())),
            SignUpResponse::User(user) => SignUpOutcome::ConfirmationRequired(user),
        })
    }

    async fn sign_out(&self, access_token: &str) -> AuthResult<()> {
        let request = self
            .client
            .auth(Method::POST, "logout")
            .bearer_auth(access_token);

        send_empty(request)
            .await
            .map_err(|e| classify(e, Call::Session))
    }

    async fn get_user(&self, access_token: &str) -> AuthResult<UserRef> {
        let request = self.client.auth(Method::GET, "user").bearer_auth(access_token);

        send_json(request)
            .await
            .map_err(|e| classify(e, Call::Session))
    }

    async fn refresh_session(&self, refresh_token: &str) -> AuthResult<Session> {
        let request = self
            .client
            .auth(Method::POST, "token?grant_type=refresh_token")
            .json(&json!({ "refresh_token": refresh_token }));

        let session: Session = send_json(request)
            .await
            .map_err(|e| classify(e, Call::Session))?;

        Ok(session.stamped(Utc::now()))
    }

    async fn reset_password_for_email(
        &self,
        email: &Email,
        redirect_to: Option<&str>,
    ) -> AuthResult<()> {
        let mut request = self
            .client
            .auth(Method::POST, "recover")
            .json(&json!({ "email": email.as_str() }));
        if let Some(redirect_to) = redirect_to {
            request = request.query(&[("redirect_to", redirect_to)]);
        }

        send_empty(request)
            .await
            .map_err(|e| classify(e, Call::Credentials))
    }

    async fn exchange_code_for_session(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> AuthResult<Session> {
        let request = self
            .client
            .auth(Method::POST, "token?grant_type=pkce")
            .json(&json!({
                "auth_code": auth_code,
                "code_verifier": code_verifier,
            }));

        let session: Session = send_json(request)
            .await
            .map_err(|e| classify(e, Call::Credentials))?;

        Ok(session.stamped(Utc::now()))
    }

    fn authorize_url(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
        code_challenge: &str,
    ) -> AuthResult<String> {
        let url = Url::parse_with_params(
            &self.client.auth_url("authorize"),
            &[
                ("provider", provider.as_str()),
                ("redirect_to", redirect_to),
                ("code_challenge", code_challenge),
                ("code_challenge_method", Pkce::method()),
            ],
        )
        .map_err(|e| AuthError::Internal(format!("Invalid authorize URL: {e}")))?;

        Ok(url.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::config::BackendConfig;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const USER_ID: &str = "6f1c2a52-6d0e-4c43-9a53-3f2b9a3b1d10";

    fn store_for(server: &MockServer) -> GoTrueSessionStore {
        let config = BackendConfig::new(&server.uri(), "anon-key").unwrap();
        GoTrueSessionStore::new(BackendClient::new(config).unwrap())
    }

    fn credentials() -> Credentials {
        Credentials::new("elder@example.com", "walking-123".to_string()).unwrap()
    }

    fn user_json() -> serde_json::Value {
        json!({ "id": USER_ID, "email": "elder@example.com", "user_metadata": {} })
    }

    fn session_json() -> serde_json::Value {
        json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1",
            "token_type": "bearer",
            "expires_in": 3600,
            "user": user_json(),
        })
    }

    #[tokio::test]
    async fn test_password_grant_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .and(header("apikey", "anon-key"))
            .and(body_partial_json(json!({ "email": "elder@example.com" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_json()))
            .expect(1)
            .mount(&server)
            .await;

        let session = store_for(&server)
            .sign_in_with_password(&credentials())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(session.access_token, "access-1");
        assert!(session.expires_at.is_some());
        assert_eq!(session.user.unwrap().id.to_string(), USER_ID);
    }

    #[tokio::test]
    async fn test_password_grant_without_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": user_json() })))
            .mount(&server)
            .await;

        let result = store_for(&server).sign_in_with_password(&credentials()).await;
        assert_eq!(result, Ok(None));
    }

    #[tokio::test]
    async fn test_wrong_password_is_verbatim_credential_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": 400,
                "error_code": "invalid_credentials",
                "msg": "Invalid login credentials"
            })))
            .mount(&server)
            .await;

        let err = store_for(&server)
            .sign_in_with_password(&credentials())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            AuthError::InvalidCredentials("Invalid login credentials".to_string())
        );
    }

    #[tokio::test]
    async fn test_legacy_error_shape_unconfirmed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Email not confirmed"
            })))
            .mount(&server)
            .await;

        let err = store_for(&server)
            .sign_in_with_password(&credentials())
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::EmailNotConfirmed);
    }

    #[tokio::test]
    async fn test_sign_up_requires_confirmation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .and(query_param("redirect_to", "http://localhost:3000/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": USER_ID,
                "email": "elder@example.com",
                "confirmation_sent_at": "2024-05-01T10:00:00Z"
            })))
            .mount(&server)
            .await;

        let outcome = store_for(&server)
            .sign_up(&credentials(), Some("http://localhost:3000/login"))
            .await
            .unwrap();
        assert!(matches!(outcome, SignUpOutcome::ConfirmationRequired(_)));
    }

    #[tokio::test]
    async fn test_sign_up_existing_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "code": 422,
                "error_code": "user_already_exists",
                "msg": "User already registered"
            })))
            .mount(&server)
            .await;

        let err = store_for(&server)
            .sign_up(&credentials(), None)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::UserAlreadyRegistered);
    }

    #[tokio::test]
    async fn test_get_user_expired_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("authorization", "Bearer stale"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "code": 401,
                "error_code": "bad_jwt",
                "msg": "invalid JWT: token is expired"
            })))
            .mount(&server)
            .await;

        let err = store_for(&server).get_user("stale").await.unwrap_err();
        assert_eq!(err, AuthError::SessionInvalid);
    }

    #[tokio::test]
    async fn test_refresh_rejected_is_session_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "refresh_token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error_code": "refresh_token_not_found",
                "msg": "Invalid Refresh Token: Refresh Token Not Found"
            })))
            .mount(&server)
            .await;

        let err = store_for(&server).refresh_session("gone").await.unwrap_err();
        assert_eq!(err, AuthError::SessionInvalid);
    }

    #[tokio::test]
    async fn test_server_error_is_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
            .mount(&server)
            .await;

        let err = store_for(&server).get_user("token").await.unwrap_err();
        assert!(matches!(err, AuthError::Backend { status: 503, .. }));
        assert!(err.is_unexpected());
    }

    #[tokio::test]
    async fn test_exchange_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "pkce"))
            .and(body_partial_json(json!({ "auth_code": "code-1", "code_verifier": "v" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_json()))
            .mount(&server)
            .await;

        let session = store_for(&server)
            .exchange_code_for_session("code-1", "v")
            .await
            .unwrap();
        assert_eq!(session.refresh_token, "refresh-1");
    }

    #[test]
    fn test_authorize_url() {
        let config = BackendConfig::new("https://p.supabase.co", "k").unwrap();
        let store = GoTrueSessionStore::new(BackendClient::new(config).unwrap());

        let url = store
            .authorize_url(
                OAuthProvider::Github,
                "http://localhost:3000/auth/callback?redirectTo=%2Fdashboard",
                "challenge",
            )
            .unwrap();
        let parsed = Url::parse(&url).unwrap();
        let params: std::collections::HashMap<_, _> = parsed.query_pairs().into_owned().collect();

        assert_eq!(parsed.path(), "/auth/v1/authorize");
        assert_eq!(params["provider"], "github");
        assert_eq!(params["code_challenge_method"], "s256");
        assert_eq!(
            params["redirect_to"],
            "http://localhost:3000/auth/callback?redirectTo=%2Fdashboard"
        );
    }
}
