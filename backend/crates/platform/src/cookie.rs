//! Cookie Management Infrastructure
//!
//! Set-Cookie construction with a shared policy, plus request-side helpers
//! to read cookies and to rewrite the `Cookie` header when tokens are
//! refreshed mid-request.

use axum::http::{HeaderMap, HeaderValue, header};

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes shared by every cookie the server writes
#[derive(Debug, Clone)]
pub struct CookiePolicy {
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self {
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
        }
    }
}

impl CookiePolicy {
    /// Build a Set-Cookie header value
    pub fn set_cookie(&self, name: &str, value: &str, max_age_secs: Option<u64>) -> String {
        let mut parts = vec![format!("{name}={value}"), format!("Path={}", self.path)];

        if let Some(max_age) = max_age_secs {
            parts.push(format!("Max-Age={max_age}"));
        }
        self.push_flags(&mut parts);

        parts.join("; ")
    }

    /// Build a Set-Cookie header value that deletes the cookie
    pub fn removal(&self, name: &str) -> String {
        let mut parts = vec![
            format!("{name}="),
            format!("Path={}", self.path),
            "Max-Age=0".to_string(),
            "Expires=Thu, 01 Jan 1970 00:00:00 GMT".to_string(),
        ];
        self.push_flags(&mut parts);

        parts.join("; ")
    }

    fn push_flags(&self, parts: &mut Vec<String>) {
        if self.http_only {
            parts.push("HttpOnly".to_string());
        }
        if self.secure {
            parts.push("Secure".to_string());
        }
        parts.push(format!("SameSite={}", self.same_site.as_str()));
    }
}

/// Extract a cookie value from request headers
///
/// Empty values are treated as absent, which is how a cleared cookie
/// comes back from some clients.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name && !value.is_empty()).then(|| value.to_string())
        })
}

/// Replace (or add) cookies in the request `Cookie` header
///
/// Used after a token refresh so that handlers further down the stack see
/// the refreshed credentials instead of the stale ones the browser sent.
pub fn rewrite_request_cookies(headers: &mut HeaderMap, updates: &[(&str, &str)]) {
    let mut pairs: Vec<(String, String)> = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            Some((key.to_string(), value.to_string()))
        })
        .filter(|(key, _)| !updates.iter().any(|(name, _)| name == key))
        .collect();

    pairs.extend(
        updates
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string())),
    );

    let joined = pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("; ");

    headers.remove(header::COOKIE);
    if let Ok(value) = HeaderValue::from_str(&joined) {
        headers.insert(header::COOKIE, value);
    }
}
