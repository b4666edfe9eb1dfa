//! Value Object Module

pub mod credentials;
pub mod email;
pub mod oauth_provider;
pub mod route;

pub use credentials::Credentials;
pub use email::Email;
pub use oauth_provider::OAuthProvider;
pub use route::{RouteClass, RouteTable};
