use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, instrument};

use super::types::SessionClaims;
use crate::shared::AppError;

/// Configuration for JWT token operations
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    pub ttl: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    /// Creates a signed token for the given user
    #[instrument(skip(self, username))]
    pub fn create_token(&self, user_id: i64, username: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = (now + self.ttl).timestamp().max(0) as usize;

        debug!(
            ttl_secs = self.ttl.num_seconds(),
            exp_timestamp = exp,
            "Creating JWT token with expiration"
        );

        let claims = SessionClaims {
            user_id,
            username: username.to_string(),
            exp,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode JWT token");
            AppError::Internal("Could not generate token".to_string())
        })
    }

    /// Checks signature and expiry and returns the claims if both hold.
    /// Revocation is not checked here.
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> Result<SessionClaims, AppError> {
        debug!("Decoding and validating JWT token");

        let mut validation = Validation::default();
        validation.leeway = 0;

        let claims = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            debug!(error = %e, "Failed to decode JWT token");
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

        // jsonwebtoken accepts exp == now; a token is already dead at its expiry second
        if claims.exp as i64 <= Utc::now().timestamp() {
            debug!(exp = claims.exp, "JWT token reached its expiry");
            return Err(AppError::Unauthorized("Invalid or expired token".to_string()));
        }

        debug!(
            user_id = claims.user_id,
            username = %claims.username,
            exp = claims.exp,
            "JWT token decoded successfully"
        );
        Ok(claims)
    }
}
