//! Server Configuration
//!
//! Process-level settings read from the environment. Backend connection
//! settings live in [`platform::config::BackendConfig`].

use std::net::SocketAddr;

use platform::config::ConfigError;

const ENV_BIND_ADDR: &str = "BIND_ADDR";
const ENV_FRONTEND_ORIGINS: &str = "FRONTEND_ORIGINS";
const ENV_COOKIE_SECURE: &str = "COOKIE_SECURE";
const ENV_SITE_URL: &str = "SITE_URL";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";
const DEFAULT_SITE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Origins allowed to call the API with credentials
    pub frontend_origins: Vec<String>,
    /// `Secure` flag on every cookie; off by default in debug builds
    pub secure_cookies: bool,
    /// Absolute origin for OAuth and email callback links
    pub site_url: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_addr = value(ENV_BIND_ADDR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .trim()
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: ENV_BIND_ADDR,
                reason: e.to_string(),
            })?;

        let frontend_origins = value(ENV_FRONTEND_ORIGINS)
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        let secure_cookies = match value(ENV_COOKIE_SECURE) {
            None => !cfg!(debug_assertions),
            Some(raw) => parse_flag(&raw).ok_or_else(|| ConfigError::Invalid {
                name: ENV_COOKIE_SECURE,
                reason: format!("expected true or false, got {raw}"),
            })?,
        };

        let site_url = value(ENV_SITE_URL)
            .unwrap_or_else(|| DEFAULT_SITE_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            bind_addr,
            frontend_origins,
            secure_cookies,
            site_url,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
