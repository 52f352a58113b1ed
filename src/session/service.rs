use chrono::{TimeZone, Utc};
use tracing::{info, instrument, warn};

use super::{blacklist::TokenBlacklist, token::TokenConfig, types::SessionClaims};
use crate::shared::AppError;

/// Service for handling session business logic: issuing, validating and
/// revoking tokens.
pub struct SessionService {
    token_config: TokenConfig,
    blacklist: TokenBlacklist,
}

impl SessionService {
    pub fn new(token_config: TokenConfig) -> Self {
        Self {
            token_config,
            blacklist: TokenBlacklist::new(),
        }
    }

    /// Issues a new session token for an authenticated user
    #[instrument(skip(self, username))]
    pub fn issue_token(&self, user_id: i64, username: &str) -> Result<String, AppError> {
        let token = self.token_config.create_token(user_id, username)?;
        info!(user_id, "Session token issued");
        Ok(token)
    }

    /// Validates a session token and returns the claims if valid
    #[instrument(skip(self, token))]
    pub async fn validate_session(&self, token: &str) -> Result<SessionClaims, AppError> {
        if token.is_empty() {
            return Err(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ));
        }

        // Signature and expiry first
        let claims = self.token_config.validate_token(token)?;

        if self.blacklist.is_revoked(token).await {
            warn!(
                user_id = claims.user_id,
                username = %claims.username,
                "Rejected revoked session token"
            );
            return Err(AppError::Unauthorized(
                "Token has been revoked".to_string(),
            ));
        }

        Ok(claims)
    }

    /// Revokes a token until the moment it would have expired on its own
    #[instrument(skip(self, token, claims), fields(user_id = claims.user_id))]
    pub async fn revoke_session(&self, token: &str, claims: &SessionClaims) {
        let expires_at = Utc
            .timestamp_opt(claims.exp as i64, 0)
            .single()
            .unwrap_or_else(Utc::now);

        self.blacklist.revoke(token, expires_at).await;
        info!(username = %claims.username, "Session revoked");
    }

    /// Drops blacklist entries for tokens that have expired anyway
    #[instrument(skip(self))]
    pub async fn cleanup_revoked_sessions(&self) -> usize {
        let removed = self.blacklist.sweep_expired().await;
        info!(removed_entries = removed, "Revoked session cleanup completed");
        removed
    }

    pub fn blacklist(&self) -> &TokenBlacklist {
        &self.blacklist
    }
}
