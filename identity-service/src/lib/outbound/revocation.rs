use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::credentials::errors::AuthError;
use crate::domain::credentials::ports::RevocationStore;

/// Process-local revoked-token set.
///
/// Suitable for a single instance only: entries are lost on restart and are
/// not shared between replicas. Each entry is kept until the token's own
/// expiry and swept lazily on the next revocation.
#[derive(Debug, Default)]
pub struct InMemoryRevocationStore {
    entries: RwLock<HashMap<String, i64>>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn revoke(&self, token: &str, expires_at: i64) -> Result<(), AuthError> {
        let now = Utc::now().timestamp();
        let mut entries = self.entries.write().await;

        entries.retain(|_, deadline| *deadline >= now);
        if expires_at >= now {
            entries.insert(token.to_string(), expires_at);
        }

        tracing::debug!(revoked = entries.len(), "Token revoked");

        Ok(())
    }

    async fn consume(&self, token: &str, expires_at: i64) -> Result<bool, AuthError> {
        let now = Utc::now().timestamp();
        let mut entries = self.entries.write().await;

        entries.retain(|_, deadline| *deadline >= now);
        if entries.contains_key(token) {
            return Ok(false);
        }
        entries.insert(token.to_string(), expires_at.max(now));

        Ok(true)
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, AuthError> {
        let now = Utc::now().timestamp();

        Ok(self
            .entries
            .read()
            .await
            .get(token)
            .is_some_and(|deadline| *deadline >= now))
    }
}
