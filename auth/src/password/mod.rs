pub mod argon2;
pub mod errors;
pub mod sha256;

use std::fmt;

use serde::Deserialize;

pub use self::argon2::Argon2Hasher;
pub use errors::PasswordError;
pub use sha256::Sha256Hasher;

/// Algorithm used for newly produced password digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordScheme {
    /// Argon2id with a random salt
    #[default]
    Argon2,
    /// Unsalted SHA-256, hex-encoded
    Sha256,
}

impl fmt::Display for PasswordScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordScheme::Argon2 => f.write_str("argon2"),
            PasswordScheme::Sha256 => f.write_str("sha256"),
        }
    }
}

/// Credential hasher.
///
/// New digests use the configured scheme. Verification picks the algorithm from
/// the stored digest's format, so digests written under the other scheme keep
/// verifying after a scheme change.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher {
    scheme: PasswordScheme,
}

impl PasswordHasher {
    /// Create a hasher producing Argon2id digests.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scheme(scheme: PasswordScheme) -> Self {
        Self { scheme }
    }

    /// Hash a plaintext password for storage.
    ///
    /// # Errors
    /// * `HashingFailed` - Argon2 hashing failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        match self.scheme {
            PasswordScheme::Argon2 => Argon2Hasher::new().hash(password),
            PasswordScheme::Sha256 => Ok(Sha256Hasher::new().hash(password)),
        }
    }

    /// Verify a plaintext password against a stored digest.
    ///
    /// # Returns
    /// True if the password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored digest is in no recognized format
    pub fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordError> {
        if Argon2Hasher::recognizes(digest) {
            Argon2Hasher::new().verify(password, digest)
        } else if Sha256Hasher::recognizes(digest) {
            Ok(Sha256Hasher::new().verify(password, digest))
        } else {
            Err(PasswordError::VerificationFailed(
                "Unrecognized password digest format".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scheme_is_argon2() {
        let hasher = PasswordHasher::new();

        let digest = hasher.hash("secret1").unwrap();
        assert!(digest.starts_with("$argon2id$"));
        assert!(hasher.verify("secret1", &digest).unwrap());
        assert!(!hasher.verify("secret2", &digest).unwrap());
    }

    #[test]
    fn test_sha256_scheme() {
        let hasher = PasswordHasher::with_scheme(PasswordScheme::Sha256);

        let digest = hasher.hash("secret1").unwrap();
        assert_eq!(digest, hasher.hash("secret1").unwrap());
        assert!(hasher.verify("secret1", &digest).unwrap());
        assert!(!hasher.verify("secret2", &digest).unwrap());
    }

    #[test]
    fn test_verify_across_schemes() {
        let legacy = PasswordHasher::with_scheme(PasswordScheme::Sha256)
            .hash("secret1")
            .unwrap();
        let current = PasswordHasher::with_scheme(PasswordScheme::Argon2)
            .hash("secret1")
            .unwrap();

        let argon2 = PasswordHasher::with_scheme(PasswordScheme::Argon2);
        let sha256 = PasswordHasher::with_scheme(PasswordScheme::Sha256);
        assert!(argon2.verify("secret1", &legacy).unwrap());
        assert!(sha256.verify("secret1", &current).unwrap());
    }

    #[test]
    fn test_verify_unrecognized_digest() {
        let hasher = PasswordHasher::new();
        let result = hasher.verify("secret1", "plaintext-secret1");
        assert!(matches!(result, Err(PasswordError::VerificationFailed(_))));
    }

    #[test]
    fn test_scheme_deserialize() {
        let scheme: PasswordScheme = serde_json::from_str("\"sha256\"").unwrap();
        assert_eq!(scheme, PasswordScheme::Sha256);
    }
}
