//! Infrastructure Layer - Table API and in-memory repositories

pub mod memory;
pub mod postgrest;
