//! Credential primitives for the trading-log API.
//!
//! - Password hashing (Argon2id, or the legacy unsalted SHA-256 digest)
//! - Compact HMAC-SHA256 signed tokens with a fixed 24 hour lifetime
//! - Validated signing secret
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{Secret, TokenService};
//!
//! let secret = Secret::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let service = TokenService::new(secret);
//! let token = service.issue("42", "alice@example.com").unwrap();
//! let subject = service.verify(&token).unwrap();
//! assert_eq!(subject.subject_id, "42");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Secret};
//!
//! let auth = Authenticator::new(Secret::new("secret_key_at_least_32_bytes_long!").unwrap());
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let result = auth
//!     .authenticate("password123", &hash, "42", "alice@example.com")
//!     .unwrap();
//!
//! // Protected request: validate token
//! let subject = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(subject.email, "alice@example.com");
//! ```

pub mod authenticator;
pub mod clock;
pub mod password;
pub mod secret;
pub mod token;

pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::PasswordScheme;
pub use secret::Secret;
pub use secret::SecretError;
pub use token::Claims;
pub use token::TokenError;
pub use token::TokenService;
pub use token::TokenSubject;
