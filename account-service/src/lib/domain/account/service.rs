use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::TokenError;
use chrono::Utc;
use tokio::task;

use super::errors::AccountError;
use super::models::AuthenticatedUser;
use super::models::LoginCommand;
use super::models::RegisterCommand;
use super::models::SignedInUser;
use super::models::User;
use super::models::UserId;
use super::ports::AccountServicePort;
use super::ports::UserStore;

/// Domain service implementation for account operations.
///
/// Password hashing and verification run on the blocking pool; token work is
/// cheap and runs inline.
pub struct AccountService<S>
where
    S: UserStore,
{
    store: Arc<S>,
    authenticator: Arc<Authenticator>,
}

impl<S> AccountService<S>
where
    S: UserStore,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Account persistence implementation
    /// * `authenticator` - Credential hasher and token service
    pub fn new(store: Arc<S>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            store,
            authenticator,
        }
    }
}

#[async_trait]
impl<S> AccountServicePort for AccountService<S>
where
    S: UserStore,
{
    async fn register(&self, command: RegisterCommand) -> Result<SignedInUser, AccountError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;
        let password_hash =
            task::spawn_blocking(move || authenticator.hash_password(password.expose()))
                .await
                .map_err(|e| AccountError::Unknown(format!("Hashing task failed: {}", e)))?
                .map_err(|e| AccountError::Credential(e.to_string()))?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            created_at: Utc::now(),
        };

        let user = self.store.insert(user).await?;

        let token = self
            .authenticator
            .issue_token(&user.id.to_string(), user.email.as_str())
            .map_err(|e| AccountError::Unknown(format!("Token issuance failed: {}", e)))?;

        tracing::info!(user_id = %user.id, username = %user.username, "Account registered");

        Ok(SignedInUser { user, token })
    }

    async fn login(&self, command: LoginCommand) -> Result<SignedInUser, AccountError> {
        let user = self.store.find_by_identifier(&command.identifier).await?;

        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;
        let outcome = task::spawn_blocking(move || match user {
            Some(user) => authenticator
                .authenticate(
                    &password,
                    &user.password_hash,
                    &user.id.to_string(),
                    user.email.as_str(),
                )
                .map(|result| SignedInUser {
                    user,
                    token: result.access_token,
                }),
            None => Err(authenticator.reject_unknown_identity(&password)),
        })
        .await
        .map_err(|e| AccountError::Unknown(format!("Verification task failed: {}", e)))?;

        match outcome {
            Ok(signed_in) => {
                tracing::info!(user_id = %signed_in.user.id, "Login succeeded");
                Ok(signed_in)
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::info!("Login rejected");
                Err(AccountError::InvalidCredentials)
            }
            Err(AuthenticationError::PasswordError(e)) => {
                tracing::error!(error = %e, "Stored password digest could not be verified");
                Err(AccountError::Credential(e.to_string()))
            }
            Err(AuthenticationError::TokenError(e)) => Err(AccountError::Unknown(format!(
                "Token issuance failed: {}",
                e
            ))),
        }
    }

    fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, AccountError> {
        let subject = self.authenticator.validate_token(token)?;

        let user_id = UserId::from_string(&subject.subject_id).map_err(|_| {
            TokenError::Malformed("subject is not a user identifier".to_string())
        })?;

        Ok(AuthenticatedUser {
            user_id,
            email: subject.email,
        })
    }
}
