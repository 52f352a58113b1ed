use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Process-wide registry of tokens that were revoked before their natural expiry.
///
/// Each entry remembers when its token would have expired anyway. Once that
/// moment has passed the signature check alone rejects the token, so
/// [`TokenBlacklist::sweep_expired`] can drop the entry.
#[derive(Default)]
pub struct TokenBlacklist {
    entries: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl TokenBlacklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a token to the blacklist. Revoking twice keeps the later expiry.
    #[instrument(skip(self, token))]
    pub async fn revoke(&self, token: &str, expires_at: DateTime<Utc>) {
        let mut entries = self.entries.write().await;
        let entry = entries.entry(token.to_string()).or_insert(expires_at);
        if *entry < expires_at {
            *entry = expires_at;
        }
        debug!(revoked_tokens = entries.len(), "Token added to blacklist");
    }

    pub async fn is_revoked(&self, token: &str) -> bool {
        self.entries.read().await.contains_key(token)
    }

    /// Removes entries whose token has expired, returning how many were dropped
    #[instrument(skip(self))]
    pub async fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let initial_count = entries.len();

        entries.retain(|_, expires_at| *expires_at > now);

        let removed = initial_count - entries.len();
        debug!(
            removed,
            remaining = entries.len(),
            "Swept expired entries from token blacklist"
        );
        removed
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
