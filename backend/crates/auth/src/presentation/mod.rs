//! Presentation Layer
//!
//! HTTP handlers, DTOs, routers, pages and the two guards.

pub mod cookies;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod pages;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{CurrentSession, require_dashboard_session, route_guard};
pub use router::{auth_router, callback_router, pages_router};
