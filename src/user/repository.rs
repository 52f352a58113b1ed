use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{NewUser, UserModel};
use crate::shared::AppError;

/// Trait for user (credential store) operations
#[async_trait]
pub trait UserRepository {
    /// Persists a new user. Fails with `Conflict` when the username or email
    /// is already taken; the check and the insert are one atomic step.
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<UserModel>, AppError>;
}

#[derive(Default)]
struct UserTable {
    next_id: i64,
    rows: BTreeMap<i64, UserModel>,
}

/// In-memory implementation of UserRepository for development and testing
///
/// Data is stored in memory and will be lost when the application restarts.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<UserTable>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current number of users in the repository
    pub async fn user_count(&self) -> usize {
        self.users.read().await.rows.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError> {
        debug!("Creating user in memory");

        let mut table = self.users.write().await;
        let taken = table
            .rows
            .values()
            .any(|existing| existing.username == user.username || existing.email == user.email);
        if taken {
            warn!("Username or email already exists in memory");
            return Err(AppError::Conflict(
                "Username or email already taken".to_string(),
            ));
        }

        table.next_id += 1;
        let now = Utc::now();
        let model = UserModel {
            id: table.next_id,
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(model.id, model.clone());

        debug!(user_id = model.id, "User created successfully in memory");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError> {
        let table = self.users.read().await;
        let user = table
            .rows
            .values()
            .find(|user| user.username == username)
            .cloned();

        debug!(found = user.is_some(), "Looked up user by username in memory");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<Option<UserModel>, AppError> {
        Ok(self.users.read().await.rows.get(&id).cloned())
    }
}

/// PostgreSQL implementation of user repository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError> {
        debug!("Creating user in database");

        let model = sqlx::query_as::<_, UserModel>(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) \
             RETURNING id, username, email, password_hash, created_at, updated_at",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create user in database");
            AppError::from(e)
        })?;

        debug!(user_id = model.id, "User created successfully in database");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError> {
        sqlx::query_as::<_, UserModel>(
            "SELECT id, username, email, password_hash, created_at, updated_at \
             FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch user by username");
            AppError::from(e)
        })
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<Option<UserModel>, AppError> {
        sqlx::query_as::<_, UserModel>(
            "SELECT id, username, email, password_hash, created_at, updated_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id = id, "Failed to fetch user by id");
            AppError::from(e)
        })
    }
}
