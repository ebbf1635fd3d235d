use crate::password::Argon2Hasher;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::password::PasswordScheme;
use crate::password::Sha256Hasher;
use crate::secret::Secret;
use crate::token::TokenError;
use crate::token::TokenService;
use crate::token::TokenSubject;

/// Argon2id digest with the hasher's default cost parameters. Matches no password.
const DUMMY_ARGON2_DIGEST: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$2Qv41DSAyMUCH071Yk2ZwA$7F76L1wDTvBSku99d+2Sq3yL+7jbSHBBqEpN7ebzk/0";

/// SHA-256 hex digest. Matches no password in practice.
const DUMMY_SHA256_DIGEST: &str =
    "ec5efa2f5c034ef05292ef7d77ed92ab7c8bfbb8db487041a84a4dede6f393fd";

/// Authentication coordinator combining password verification and token issuance.
///
/// Provides high-level authentication operations by coordinating
/// the credential hasher and the token service.
#[derive(Debug)]
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_service: TokenService,
}

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// Signed bearer token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create an authenticator hashing new passwords with Argon2id.
    ///
    /// # Arguments
    /// * `secret` - Validated token signing secret
    pub fn new(secret: Secret) -> Self {
        Self::with_scheme(secret, PasswordScheme::default())
    }

    /// Create an authenticator hashing new passwords with `scheme`.
    pub fn with_scheme(secret: Secret, scheme: PasswordScheme) -> Self {
        Self::from_parts(
            PasswordHasher::with_scheme(scheme),
            TokenService::new(secret),
        )
    }

    /// Assemble an authenticator from preconfigured components.
    pub fn from_parts(password_hasher: PasswordHasher, token_service: TokenService) -> Self {
        Self {
            password_hasher,
            token_service,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password digest
    /// * `subject_id` - Identifier to place in the token
    /// * `email` - Email claim to place in the token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored digest could not be interpreted
    /// * `TokenError` - Token issuance failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject_id: &str,
        email: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let outcome = self.password_hasher.verify(password, stored_hash);
        self.verify_other_schemes(password, Some(stored_hash));

        if !outcome? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.token_service.issue(subject_id, email)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Reject a login for an identity that does not exist.
    ///
    /// Runs one verification per scheme against dummy digests, the same work a
    /// known identity's login does whatever scheme its digest was written in.
    pub fn reject_unknown_identity(&self, password: &str) -> AuthenticationError {
        self.verify_other_schemes(password, None);

        AuthenticationError::InvalidCredentials
    }

    /// Verify `password` against the dummy digest of every scheme `digest` is not in.
    fn verify_other_schemes(&self, password: &str, digest: Option<&str>) {
        if !digest.is_some_and(Argon2Hasher::recognizes) {
            let _ = self.password_hasher.verify(password, DUMMY_ARGON2_DIGEST);
        }
        if !digest.is_some_and(Sha256Hasher::recognizes) {
            let _ = self.password_hasher.verify(password, DUMMY_SHA256_DIGEST);
        }
    }

    /// Issue a token without password verification.
    ///
    /// Used right after registration, when the password was just set.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed
    pub fn issue_token(&self, subject_id: &str, email: &str) -> Result<String, TokenError> {
        self.token_service.issue(subject_id, email)
    }

    /// Verify a presented token.
    ///
    /// # Errors
    /// * `Malformed`, `InvalidSignature`, `Expired` - Token rejected
    pub fn validate_token(&self, token: &str) -> Result<TokenSubject, TokenError> {
        self.token_service.verify(token)
    }
}
