//! One-shot numeric verification codes for registration and password reset.
//!
//! A code is stored on the user row together with its expiry. It is consumed
//! (cleared) by the first successful password set.

use chrono::Duration;
use rand::Rng;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Number of digits in a verification code.
pub const CODE_LENGTH: usize = 4;

/// Lifetime of a freshly issued code.
pub const CODE_TTL_MINUTES: i64 = 10;

/// The single message returned for every verification failure.
pub const INVALID_CODE_MESSAGE: &str = "Invalid or expired verification code";

/// Why a code is being issued. Only affects the email wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePurpose {
    Registration,
    PasswordReset,
}

/// A freshly generated code and the moment it stops being valid.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    pub code: String,
    pub expires_at: Timestamp,
}

/// Generate a zero-padded 4-digit code valid for [`CODE_TTL_MINUTES`] from `now`.
pub fn issue_code(now: Timestamp) -> IssuedCode {
    let value: u32 = rand::rng().random_range(0..10_u32.pow(CODE_LENGTH as u32));
    IssuedCode {
        code: format!("{value:0width$}", width = CODE_LENGTH),
        expires_at: now + Duration::minutes(CODE_TTL_MINUTES),
    }
}

/// Check a supplied code against the stored one.
///
/// Wrong code, missing code and expired code all produce the same error so
/// callers cannot tell them apart.
pub fn verify_code(
    stored_code: Option<&str>,
    expires_at: Option<Timestamp>,
    supplied: &str,
    now: Timestamp,
) -> Result<(), CoreError> {
    let matches = stored_code.is_some_and(|stored| constant_time_eq(stored, supplied));
    let fresh = expires_at.is_some_and(|expiry| now < expiry);
    if matches && fresh {
        Ok(())
    } else {
        Err(CoreError::Validation(INVALID_CODE_MESSAGE.into()))
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
