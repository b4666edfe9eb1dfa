//! Domain Entities

pub mod auth_state;
pub mod session;

pub use auth_state::AuthState;
pub use session::{AuthChange, AuthChangeEvent, ResolvedSession, Session, SignUpOutcome, UserRef};
