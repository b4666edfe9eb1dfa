//! Route Classification
//!
//! Static partition of request paths into Public, AuthOnly and Protected.
//! AuthOnly routes are checked first, then Public; anything unmatched is
//! Protected.

use url::form_urlencoded;

/// Query parameter carrying the post-login destination
pub const REDIRECT_TO_PARAM: &str = "redirectTo";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Reachable without a session
    Public,
    /// Sign-in pages; signed-in users are sent to the landing route
    AuthOnly,
    /// Requires a session (default)
    Protected,
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    pub public: Vec<String>,
    pub auth_only: Vec<String>,
    /// Prefixes the guard never runs for (static assets)
    pub excluded: Vec<String>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            public: to_owned(&["/", "/login", "/register", "/reset-password", "/auth", "/api/auth"]),
            auth_only: to_owned(&["/login", "/register", "/reset-password"]),
            excluded: to_owned(&["/_next/static", "/_next/image", "/favicon.ico"]),
        }
    }
}

fn to_owned(routes: &[&str]) -> Vec<String> {
    routes.iter().map(|r| r.to_string()).collect()
}

impl RouteTable {
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.auth_only.iter().any(|route| route_matches(path, route)) {
            RouteClass::AuthOnly
        } else if self.public.iter().any(|route| route_matches(path, route)) {
            RouteClass::Public
        } else {
            RouteClass::Protected
        }
    }

    /// Whether the route guard runs for this path
    ///
    /// Static asset prefixes and anything that looks like a file
    /// (contains a `.`) are skipped.
    pub fn guard_applies(&self, path: &str) -> bool {
        !path.contains('.')
            && !self
                .excluded
                .iter()
                .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

/// `path == route` or `path` is below `route`
pub fn route_matches(path: &str, route: &str) -> bool {
    match path.strip_prefix(route) {
        Some("") => true,
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}

/// Login location for an unauthenticated request to `requested`
///
/// Requests for the login route itself get no `redirectTo`.
pub fn login_redirect_location(login_route: &str, requested: &str) -> String {
    if route_matches(requested, login_route) {
        return login_route.to_string();
    }

    let encoded: String = form_urlencoded::byte_serialize(requested.as_bytes()).collect();
    format!("{login_route}?{REDIRECT_TO_PARAM}={encoded}")
}

/// Accept only same-origin relative paths as post-login destinations
pub fn safe_redirect_target(candidate: Option<&str>) -> Option<String> {
    let candidate = candidate?.trim();

    let is_relative = candidate.starts_with('/')
        && !candidate.starts_with("//")
        && !candidate.starts_with("/\\")
        && !candidate.chars().any(|c| c.is_control());

    is_relative.then(|| candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_matches_exact_and_prefix() {
        assert!(route_matches("/login", "/login"));
        assert!(route_matches("/login/magic", "/login"));
        assert!(!route_matches("/loginx", "/login"));
        assert!(route_matches("/", "/"));
        assert!(!route_matches("/dashboard", "/"));
        assert!(route_matches("//dashboard", "/"));
    }

    #[test]
    fn test_classify() {
        let table = RouteTable::default();
        assert_eq!(table.classify("/"), RouteClass::Public);
        assert_eq!(table.classify("/login"), RouteClass::AuthOnly);
        assert_eq!(table.classify("/register"), RouteClass::AuthOnly);
        assert_eq!(table.classify("/reset-password"), RouteClass::AuthOnly);
        assert_eq!(table.classify("/auth/callback"), RouteClass::Public);
        assert_eq!(table.classify("/api/auth/login"), RouteClass::Public);
        assert_eq!(table.classify("/dashboard"), RouteClass::Protected);
        assert_eq!(table.classify("/dashboard/settings"), RouteClass::Protected);
        assert_eq!(table.classify("/brand-new-page"), RouteClass::Protected);
        assert_eq!(table.classify("/registered"), RouteClass::Protected);
    }

    #[test]
    fn test_every_path_has_exactly_one_class() {
        let table = RouteTable::default();
        for path in ["/", "/login", "/x", "/auth", "/api", "/api/auth/status"] {
            let class = table.classify(path);
            assert!(matches!(
                class,
                RouteClass::Public | RouteClass::AuthOnly | RouteClass::Protected
            ));
        }
    }

    #[test]
    fn test_guard_matcher_skips_assets() {
        let table = RouteTable::default();
        assert!(!table.guard_applies("/_next/static/chunks/main.js"));
        assert!(!table.guard_applies("/_next/image"));
        assert!(!table.guard_applies("/favicon.ico"));
        assert!(!table.guard_applies("/logo.svg"));
        assert!(table.guard_applies("/static/app"));
        assert!(table.guard_applies("/staticreport"));
        assert!(table.guard_applies("/dashboard"));
        assert!(table.guard_applies("/"));
    }

    #[test]
    fn test_login_redirect_location() {
        assert_eq!(
            login_redirect_location("/login", "/dashboard/settings"),
            "/login?redirectTo=%2Fdashboard%2Fsettings"
        );
        assert_eq!(login_redirect_location("/login", "/login"), "/login");
    }

    #[test]
    fn test_safe_redirect_target() {
        assert_eq!(
            safe_redirect_target(Some("/dashboard/history")),
            Some("/dashboard/history".to_string())
        );
        assert_eq!(safe_redirect_target(Some("https://evil.example")), None);
        assert_eq!(safe_redirect_target(Some("//evil.example")), None);
        assert_eq!(safe_redirect_target(Some("/\\evil.example")), None);
        assert_eq!(safe_redirect_target(None), None);
    }
}
