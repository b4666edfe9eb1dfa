//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Session entities, route classification, Session Store trait
//! - `application/` - Use cases and configuration
//! - `infra/` - Hosted identity API client and an in-memory store
//! - `presentation/` - Route Guard, Dashboard Layout Guard, handlers, pages
//! - `client/` - Per-tab auth state: session client, auth context, forms, theme
//!
//! ## Security Model
//! - The hosted backend is the only authority on sessions; nothing here
//!   decodes or trusts token contents
//! - Every request is re-validated; ambiguous session state is treated as
//!   signed out (fail-closed)
//! - Backend errors are converted into [`AuthError`] at the store boundary
//!   and never reach a response body verbatim unless they are credential
//!   errors meant for the user

pub mod application;
pub mod client;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::repository::SessionStore;
pub use error::{AuthError, AuthResult};
pub use infra::gotrue::GoTrueSessionStore;
pub use infra::memory::InMemorySessionStore;
pub use presentation::handlers::AuthAppState;
pub use presentation::middleware::{CurrentSession, require_dashboard_session, route_guard};
pub use presentation::router::{auth_router, callback_router, pages_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
