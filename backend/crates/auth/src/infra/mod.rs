//! Infrastructure Layer
//!
//! Session Store implementations: the hosted identity REST API and an
//! in-process store for tests and local development.

pub mod gotrue;
pub mod memory;

pub use gotrue::GoTrueSessionStore;
pub use memory::InMemorySessionStore;
