//! Domain Layer
//!
//! Session entities, route classification and the Session Store trait.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{AuthState, ResolvedSession, Session, SignUpOutcome, UserRef};
pub use repository::SessionStore;
pub use value_object::{Credentials, Email, OAuthProvider, RouteClass, RouteTable};
