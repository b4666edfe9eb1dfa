//! Gait (Dashboard Data) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Gait measurements, alerts, profiles, sidebar navigation
//! - `application/` - Use cases and configuration
//! - `infra/` - Table API client and an in-memory repository
//! - `presentation/` - Dashboard handlers behind the Dashboard Layout Guard
//!
//! ## Data Access Model
//! - Every query runs with the signed-in user's access token; the backend's
//!   row-level security decides which rows are visible
//! - Measurements are produced by the edge device; nothing here computes
//!   gait metrics, it only summarizes them for display

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::GaitConfig;
pub use domain::repository::GaitRepository;
pub use error::{GaitError, GaitResult};
pub use infra::memory::InMemoryGaitRepository;
pub use infra::postgrest::PostgrestGaitRepository;
pub use presentation::handlers::GaitAppState;
pub use presentation::router::dashboard_router;

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::navigation::*;
    pub use crate::domain::services::GaitSummary;
    pub use crate::presentation::dto::*;
}

#[cfg(test)]
mod tests;
