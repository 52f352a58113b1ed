use std::sync::Arc;
use tokio::task;
use tracing::{info, instrument, warn};

use super::{
    models::{NewUser, UserModel},
    password::{hash_password, verify_against_dummy, verify_password},
    repository::UserRepository,
    types::{LoginRequest, RegisterRequest},
    validation::validate_registration,
};
use crate::session::service::SessionService;
use crate::shared::AppError;

const INVALID_CREDENTIAL: &str = "Invalid credential";

/// Service for registration and login
pub struct UserService {
    repository: Arc<dyn UserRepository + Send + Sync>,
    session_service: Arc<SessionService>,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository + Send + Sync>,
        session_service: Arc<SessionService>,
    ) -> Self {
        Self {
            repository,
            session_service,
        }
    }

    /// Validates, hashes and stores a new user
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> Result<UserModel, AppError> {
        validate_registration(&request)?;

        let password = request.password;
        let password_hash = task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))??;
        let new_user = NewUser {
            username: request.username.trim().to_string(),
            email: request.email.trim().to_string(),
            password_hash,
        };

        // Uniqueness is the repository's job; a duplicate surfaces as Conflict
        let user = self.repository.create_user(&new_user).await?;

        info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Checks credentials and issues a session token.
    /// Unknown usernames and wrong passwords fail identically.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: LoginRequest) -> Result<String, AppError> {
        // Stored usernames are trimmed at registration
        let username = request.username.trim();
        let user = self.repository.find_by_username(username).await?;

        let password = request.password;
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let verified = task::spawn_blocking(move || match stored_hash {
            Some(hash) => verify_password(&password, &hash),
            None => {
                verify_against_dummy(&password);
                false
            }
        })
        .await
        .map_err(|e| AppError::Internal(format!("Password check task failed: {}", e)))?;

        let Some(user) = user.filter(|_| verified) else {
            warn!("Login failed");
            return Err(AppError::Unauthorized(INVALID_CREDENTIAL.to_string()));
        };

        let token = self.session_service.issue_token(user.id, &user.username)?;
        info!(user_id = user.id, "Login succeeded");
        Ok(token)
    }
}
