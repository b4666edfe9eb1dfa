//! Clear Text Password Handling
//!
//! Passwords are never hashed or stored here: the hosted backend owns
//! credential storage. This module only makes sure the clear text spends
//! as little time in memory as possible and is normalized consistently
//! before it is sent.
//!
//! - Unicode NFKC normalization
//! - Zeroization on drop
//! - Redacted `Debug`
//! - Sign-up strength policy matching the backend's defaults

use std::fmt;

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length accepted at sign-up (backend default)
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length in bytes (bcrypt truncates beyond 72)
pub const MAX_PASSWORD_BYTES: usize = 72;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password should be at least {min} characters")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} bytes")]
    TooLong { max: usize, actual: usize },

    #[error("Please enter a password")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Not `Clone`, so copies have to be explicit.
///
/// ## Examples
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let password = ClearTextPassword::new("correct horse".to_string()).unwrap();
/// assert!(password.check_strength().is_ok());
/// assert_eq!(format!("{password:?}"), "ClearTextPassword(\"[REDACTED]\")");
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Accept any non-blank password without control characters.
    ///
    /// Sign-in uses this directly; length rules are the backend's call for
    /// existing accounts.
    pub fn new(mut raw: String) -> Result<Self, PasswordPolicyError> {
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        if normalized
            .chars()
            .any(|ch| ch.is_control() && ch != ' ' && ch != '\t')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(Self(normalized))
    }

    /// Strength rules applied before creating an account
    pub fn check_strength(&self) -> Result<(), PasswordPolicyError> {
        let char_count = self.0.chars().count();
        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if self.0.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_BYTES,
                actual: self.0.len(),
            });
        }

        Ok(())
    }

    /// Borrow the clear text for the outgoing request body
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}
