//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Backend-as-a-service connection settings and HTTP client
//! - Cookie policy and header helpers
//! - Clear text password handling (zeroized, NFKC normalized)
//! - Cryptographic helpers (random tokens, SHA-256, PKCE)

pub mod backend;
pub mod config;
pub mod cookie;
pub mod crypto;
pub mod password;
