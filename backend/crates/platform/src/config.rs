//! Backend Connection Configuration
//!
//! The hosted backend is reached with two required values: its endpoint
//! URL and its public (anon) API key. A process without both must not
//! start.

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Environment variable holding the backend endpoint URL
pub const ENV_BACKEND_URL: &str = "SUPABASE_URL";
/// Environment variable holding the public API key
pub const ENV_BACKEND_ANON_KEY: &str = "SUPABASE_ANON_KEY";

/// Names accepted for compatibility with the web frontend's `.env`
const FALLBACK_URL_VARS: &[&str] = &["NEXT_PUBLIC_SUPABASE_URL"];
const FALLBACK_KEY_VARS: &[&str] = &["NEXT_PUBLIC_SUPABASE_ANON_KEY"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing {0}")]
    Missing(&'static str),

    #[error("Invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Connection settings for the hosted backend
#[derive(Clone)]
pub struct BackendConfig {
    /// Project endpoint, e.g. `https://xyzcompany.supabase.co`
    pub url: Url,
    /// Public API key sent as `apikey` on every request
    pub anon_key: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url.as_str())
            .field("anon_key", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl BackendConfig {
    pub fn new(url: &str, anon_key: impl Into<String>) -> Result<Self, ConfigError> {
        let url = Url::parse(url.trim()).map_err(|e| ConfigError::Invalid {
            name: ENV_BACKEND_URL,
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                name: ENV_BACKEND_URL,
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }

        let anon_key = anon_key.into();
        if anon_key.trim().is_empty() {
            return Err(ConfigError::Missing(ENV_BACKEND_ANON_KEY));
        }

        Ok(Self {
            url,
            anon_key,
            request_timeout: Duration::from_secs(15),
            connect_timeout: Duration::from_secs(5),
        })
    }

    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary lookup (environment, test map, ...)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first_set = |primary: &str, fallbacks: &[&str]| {
            std::iter::once(primary)
                .chain(fallbacks.iter().copied())
                .filter_map(&lookup)
                .find(|v| !v.trim().is_empty())
        };

        let url = first_set(ENV_BACKEND_URL, FALLBACK_URL_VARS)
            .ok_or(ConfigError::Missing(ENV_BACKEND_URL))?;
        let anon_key = first_set(ENV_BACKEND_ANON_KEY, FALLBACK_KEY_VARS)
            .ok_or(ConfigError::Missing(ENV_BACKEND_ANON_KEY))?;

        Self::new(&url, anon_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_from_lookup_ok() {
        let config = BackendConfig::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://project.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]))
        .unwrap();

        assert_eq!(config.url.as_str(), "https://project.supabase.co/");
        assert_eq!(config.anon_key, "anon");
    }

    #[test]
    fn test_missing_url_is_fatal() {
        let err = BackendConfig::from_lookup(lookup(&[("SUPABASE_ANON_KEY", "anon")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("SUPABASE_URL"));
    }

    #[test]
    fn test_missing_key_is_fatal() {
        let err = BackendConfig::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://project.supabase.co"),
            ("SUPABASE_ANON_KEY", "   "),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("SUPABASE_ANON_KEY"));
    }

    #[test]
    fn test_frontend_variable_names_are_accepted() {
        let config = BackendConfig::from_lookup(lookup(&[
            ("NEXT_PUBLIC_SUPABASE_URL", "http://localhost:54321"),
            ("NEXT_PUBLIC_SUPABASE_ANON_KEY", "anon"),
        ]))
        .unwrap();
        assert_eq!(config.url.port(), Some(54321));
    }

    #[test]
    fn test_invalid_url() {
        let err = BackendConfig::new("ftp://example.com", "anon").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert!(BackendConfig::new("not a url", "anon").is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = BackendConfig::new("https://p.supabase.co", "secret-anon-key").unwrap();
        assert!(!format!("{config:?}").contains("secret-anon-key"));
    }
}
