use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::db::models::UserRecord;
use crate::error::DatabaseError;

/// Persistence seen by the authentication service. The store, not the
/// caller, is the authority on email uniqueness.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DatabaseError>;

    /// Fails with `DatabaseError::Duplicate` when the email already exists.
    async fn create(&self, email: &str, password_hash: &str) -> Result<UserRecord, DatabaseError>;

    async fn close(&self) {}
}

/// Process-local store keyed by email.
#[derive(Default)]
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl MemoryCredentialStore {
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
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DatabaseError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<UserRecord, DatabaseError> {
        let mut users = self.users.write().await;
        if users.contains_key(email) {
            return Err(DatabaseError::Duplicate);
        }

        let record = UserRecord::new(email.to_string(), password_hash.to_string());
        users.insert(email.to_string(), record.clone());
        debug!("Stored user {} in memory", record.id);

        Ok(record)
    }
}
