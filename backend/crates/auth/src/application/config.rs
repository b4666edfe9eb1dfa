//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookiePolicy;

use crate::domain::value_object::RouteTable;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Access token cookie name
    pub access_cookie_name: String,
    /// Refresh token cookie name
    pub refresh_cookie_name: String,
    /// PKCE verifier cookie name (OAuth round trip only)
    pub verifier_cookie_name: String,
    /// Lifetime of the session cookies (1 week). Token expiry is enforced
    /// by the backend, not by the cookie.
    pub session_cookie_ttl: Duration,
    /// Lifetime of the verifier cookie (10 minutes)
    pub verifier_cookie_ttl: Duration,
    /// Flags shared by every cookie
    pub cookie: CookiePolicy,
    /// Where unauthenticated users are sent
    pub login_route: String,
    /// Where signed-in users land by default
    pub landing_route: String,
    /// Where the client goes after logout
    pub logout_redirect: String,
    /// Path the OAuth provider returns to
    pub oauth_callback_route: String,
    /// Absolute origin used for OAuth and email callback links
    pub site_url: String,
    pub routes: RouteTable,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_cookie_name: "sb-access-token".to_string(),
            refresh_cookie_name: "sb-refresh-token".to_string(),
            verifier_cookie_name: "sb-code-verifier".to_string(),
            session_cookie_ttl: Duration::from_secs(7 * 24 * 3600), // 1 week
            verifier_cookie_ttl: Duration::from_secs(10 * 60),
            cookie: CookiePolicy::default(),
            login_route: "/login".to_string(),
            landing_route: "/dashboard".to_string(),
            logout_redirect: "/login".to_string(),
            oauth_callback_route: "/auth/callback".to_string(),
            site_url: "http://localhost:3000".to_string(),
            routes: RouteTable::default(),
        }
    }
}

impl AuthConfig {
    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie: CookiePolicy {
                secure: false,
                ..CookiePolicy::default()
            },
            ..Default::default()
        }
    }

    pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
        self.site_url = site_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.cookie.secure = secure;
        self
    }

    /// `{site_url}{path}`
    pub fn site_link(&self, path: &str) -> String {
        format!("{}{}", self.site_url.trim_end_matches('/'), path)
    }

    /// Location the login page sends users to after a registration that
    /// still needs email confirmation
    pub fn registered_redirect(&self) -> String {
        format!("{}?registered=true", self.login_route)
    }

    pub fn reset_requested_redirect(&self) -> String {
        format!("{}?reset=requested", self.login_route)
    }

    pub fn oauth_failed_redirect(&self) -> String {
        format!("{}?error=oauth", self.login_route)
    }
}
