use async_trait::async_trait;

use super::errors::AccountError;
use super::models::AuthenticatedUser;
use super::models::LoginCommand;
use super::models::RegisterCommand;
use super::models::SignedInUser;
use super::models::User;

/// Port for account domain service operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new account and issue its first token.
    ///
    /// # Arguments
    /// * `command` - Validated email, username and password
    ///
    /// # Returns
    /// Created account with a bearer token
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Credential` - Password hashing failed
    /// * `DatabaseError` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<SignedInUser, AccountError>;

    /// Verify a password for an email or username and issue a token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown identity or wrong password (indistinguishable)
    /// * `DatabaseError` - Store operation failed
    async fn login(&self, command: LoginCommand) -> Result<SignedInUser, AccountError>;

    /// Verify a presented bearer token.
    ///
    /// # Errors
    /// * `Unauthorized` - Token malformed, wrongly signed or expired
    fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, AccountError>;
}

/// Persistence operations for accounts.
///
/// Implementations enforce email and username uniqueness atomically.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Retrieve an account by email address or username.
    ///
    /// # Returns
    /// Optional account (None if neither matches)
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, AccountError>;

    /// Persist a new account.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Store operation failed
    async fn insert(&self, user: User) -> Result<User, AccountError>;
}
