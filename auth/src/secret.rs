use std::fmt;

use thiserror::Error;

/// Minimum secret length in bytes (256 bits, the HS256 key size).
pub const MIN_SECRET_LENGTH: usize = 32;

/// Values that ship in sample configs and must never sign real tokens.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "secret",
    "changeme",
    "change-me",
    "your-secret-key",
    "your_secret_key",
    "your-secret-key-change-in-production",
    "default-secret",
    "default_secret",
    "jwt-secret",
    "jwt_secret",
    "supersecret",
    "replace-me-with-a-real-secret-of-at-least-32-bytes",
];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SecretError {
    #[error("Token signing secret is not configured")]
    Missing,

    #[error("Token signing secret is a known placeholder value")]
    Placeholder,

    #[error("Token signing secret too short: minimum {min} bytes, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Server-held token signing key.
///
/// Only constructible through validation. `Debug` never prints the value.
#[derive(Clone)]
pub struct Secret(Vec<u8>);

impl Secret {
    /// Validate a configured secret.
    ///
    /// # Errors
    /// * `Missing` - Value is empty or whitespace
    /// * `Placeholder` - Value matches a well-known sample secret
    /// * `TooShort` - Fewer than 32 bytes
    pub fn new(value: impl AsRef<[u8]>) -> Result<Self, SecretError> {
        let value = value.as_ref();

        if value.iter().all(u8::is_ascii_whitespace) {
            return Err(SecretError::Missing);
        }

        if let Ok(text) = std::str::from_utf8(value) {
            let text = text.trim();
            if PLACEHOLDER_SECRETS
                .iter()
                .any(|placeholder| text.eq_ignore_ascii_case(placeholder))
            {
                return Err(SecretError::Placeholder);
            }
        }

        if value.len() < MIN_SECRET_LENGTH {
            return Err(SecretError::TooShort {
                min: MIN_SECRET_LENGTH,
                actual: value.len(),
            });
        }

        Ok(Self(value.to_vec()))
    }

    /// Validate an optional setting, treating absence like an empty value.
    pub fn from_setting(value: Option<&str>) -> Result<Self, SecretError> {
        match value {
            Some(value) => Self::new(value),
            None => Err(SecretError::Missing),
        }
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}
