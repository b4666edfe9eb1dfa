//! Presentation Layer
//!
//! Dashboard handlers and DTOs. Everything here sits behind the
//! Dashboard Layout Guard.

pub mod dto;
pub mod handlers;
pub mod router;
