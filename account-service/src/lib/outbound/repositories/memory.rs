use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::User;
use crate::domain::account::ports::UserStore;

/// Process-local account store.
///
/// Uniqueness checks and insertion happen under one write lock, so concurrent
/// registrations of the same email or username cannot both succeed.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, AccountError> {
        let users = self.users.read().await;

        Ok(users
            .iter()
            .find(|user| user.email.as_str() == identifier || user.username.as_str() == identifier)
            .cloned())
    }

    async fn insert(&self, user: User) -> Result<User, AccountError> {
        let mut users = self.users.write().await;

        if users.iter().any(|existing| existing.email == user.email) {
            return Err(AccountError::EmailAlreadyExists(user.email.to_string()));
        }
        if users.iter().any(|existing| existing.username == user.username) {
            return Err(AccountError::UsernameAlreadyExists(
                user.username.to_string(),
            ));
        }

        users.push(user.clone());
        Ok(user)
    }
}
