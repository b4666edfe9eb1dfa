//! Session cookie helpers shared by handlers and guards

use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{IntoResponse, Response};
use platform::cookie::extract_cookie;

use crate::application::check_session::SessionTokens;
use crate::application::config::AuthConfig;
use crate::domain::entity::Session;

/// Read the access/refresh tokens from request cookies
pub fn session_tokens(headers: &HeaderMap, config: &AuthConfig) -> SessionTokens {
    SessionTokens {
        access_token: extract_cookie(headers, &config.access_cookie_name),
        refresh_token: extract_cookie(headers, &config.refresh_cookie_name),
    }
}

/// Set-Cookie values installing `session`
pub fn session_cookies(config: &AuthConfig, session: &Session) -> Vec<String> {
    let max_age = Some(config.session_cookie_ttl.as_secs());
    vec![
        config
            .cookie
            .set_cookie(&config.access_cookie_name, &session.access_token, max_age),
        config
            .cookie
            .set_cookie(&config.refresh_cookie_name, &session.refresh_token, max_age),
    ]
}

/// Set-Cookie values deleting the session
pub fn cleared_session_cookies(config: &AuthConfig) -> Vec<String> {
    vec![
        config.cookie.removal(&config.access_cookie_name),
        config.cookie.removal(&config.refresh_cookie_name),
    ]
}

/// Append Set-Cookie headers without touching the ones already present
pub fn append_set_cookies(headers: &mut HeaderMap, cookies: &[String]) {
    for cookie in cookies {
        match HeaderValue::from_str(cookie) {
            Ok(value) => {
                headers.append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, "Dropping malformed Set-Cookie value"),
        }
    }
}

pub fn with_cookies(response: impl IntoResponse, cookies: &[String]) -> Response {
    let mut response = response.into_response();
    append_set_cookies(response.headers_mut(), cookies);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn session() -> Session {
        Session {
            access_token: "a1".into(),
            refresh_token: "r1".into(),
            expires_in: Some(3600),
            expires_at: None,
            token_type: "bearer".into(),
            user: None,
        }
    }

    #[test]
    fn test_session_cookies() {
        let config = AuthConfig::default();
        let cookies = session_cookies(&config, &session());
        assert!(cookies[0].starts_with("sb-access-token=a1;"));
        assert!(cookies[1].starts_with("sb-refresh-token=r1;"));
        assert!(cookies.iter().all(|c| c.contains("Max-Age=604800")));
    }

    #[test]
    fn test_with_cookies_appends() {
        let config = AuthConfig::default();
        let mut cookies = session_cookies(&config, &session());
        cookies.extend(cleared_session_cookies(&config));

        let response = with_cookies(StatusCode::OK, &cookies);
        assert_eq!(response.headers().get_all(header::SET_COOKIE).iter().count(), 4);
    }

    #[test]
    fn test_session_tokens_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("sb-access-token=a; sb-refresh-token=r"),
        );
        let tokens = session_tokens(&headers, &AuthConfig::default());
        assert_eq!(tokens.access_token.as_deref(), Some("a"));
        assert_eq!(tokens.refresh_token.as_deref(), Some("r"));
    }
}
