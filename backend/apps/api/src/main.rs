//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod app;
mod config;

use auth::{AuthAppState, AuthConfig, GoTrueSessionStore};
use axum::http::{self, Method, header};
use gait::{GaitAppState, GaitConfig, PostgrestGaitRepository};
use platform::backend::BackendClient;
use platform::config::BackendConfig;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::build_router;
use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,gait=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Configuration: both backend values are required
    let backend_config = BackendConfig::from_env()?;
    let server_config = ServerConfig::from_env()?;

    tracing::info!(backend = %backend_config.url, "Using hosted backend");

    let client = BackendClient::new(backend_config)?;

    let auth_config = AuthConfig::default()
        .with_site_url(server_config.site_url.clone())
        .with_secure_cookies(server_config.secure_cookies);
    if !server_config.secure_cookies {
        tracing::warn!("Session cookies are sent without the Secure flag");
    }

    let auth_state = AuthAppState::new(GoTrueSessionStore::new(client.clone()), auth_config);
    let gait_state = GaitAppState::new(PostgrestGaitRepository::new(client), GaitConfig::default());

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = server_config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    let app = build_router(auth_state, gait_state).layer(cors);

    // Start server
    let addr = server_config.bind_addr;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
