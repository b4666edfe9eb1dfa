//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Contains use case implementations.

pub mod acknowledge_alert;
pub mod config;
pub mod dashboard;
pub mod fetch_data;

pub use acknowledge_alert::AcknowledgeAlertUseCase;
pub use dashboard::{DashboardOverview, DashboardOverviewUseCase};
pub use fetch_data::{FetchAlertsUseCase, FetchGaitDataUseCase};
