//! Application Layer
//!
//! Use cases and application services.

pub mod check_session;
pub mod config;
pub mod oauth;
pub mod reset_password;
pub mod set_session;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;

// Re-exports
pub use check_session::{CheckSessionUseCase, SessionTokens};
pub use config::AuthConfig;
pub use oauth::{OAuthStart, OAuthUseCase};
pub use reset_password::ResetPasswordUseCase;
pub use set_session::{SetSessionInput, SetSessionUseCase};
pub use sign_in::{SignInInput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpUseCase};
