//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (GaitData, Alert, Profile)
//! - Domain services (overview statistics)
//! - Sidebar navigation
//! - Repository traits (interfaces)

pub mod entities;
pub mod navigation;
pub mod repository;
pub mod services;
