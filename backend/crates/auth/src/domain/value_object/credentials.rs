//! Email + password pair for password grants and sign-up

use platform::password::ClearTextPassword;

use super::email::Email;
use crate::error::{AuthError, AuthResult};

pub const MISSING_CREDENTIALS: &str = "Please enter both email and password";

#[derive(Debug)]
pub struct Credentials {
    pub email: Email,
    pub password: ClearTextPassword,
}

impl Credentials {
    pub fn new(email: &str, password: String) -> AuthResult<Self> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::InvalidInput(MISSING_CREDENTIALS.to_string()));
        }

        let email = Email::new(email)?;
        let password = ClearTextPassword::new(password)
            .map_err(|e| AuthError::InvalidInput(e.to_string()))?;

        Ok(Self { email, password })
    }

    /// Additional strength rules for new accounts
    pub fn for_sign_up(email: &str, password: String) -> AuthResult<Self> {
        let credentials = Self::new(email, password)?;
        credentials.password.check_strength()?;
        Ok(credentials)
    }
}
