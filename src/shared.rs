use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use crate::product::repository::ProductRepository;
use crate::session::service::SessionService;
use crate::storage::ImageStore;
use crate::user::repository::UserRepository;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub user_repository: Arc<dyn UserRepository + Send + Sync>,
    pub product_repository: Arc<dyn ProductRepository + Send + Sync>,
    pub session_service: Arc<SessionService>,
    pub image_store: Arc<ImageStore>,
}

impl AppState {
    pub fn new(
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        product_repository: Arc<dyn ProductRepository + Send + Sync>,
        session_service: Arc<SessionService>,
        image_store: Arc<ImageStore>,
    ) -> Self {
        Self {
            user_repository,
            product_repository,
            session_service,
            image_store,
        }
    }
}

/// Field name -> human readable problem, rendered as `{"error": {...}}`
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid fields: {0:?}")]
    InvalidFields(FieldErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error): (StatusCode, Value) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, Value::String(msg)),
            AppError::InvalidFields(fields) => (StatusCode::BAD_REQUEST, json!(fields)),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, Value::String(msg)),
            // Duplicate registrations have always been reported as a plain bad request
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, Value::String(msg)),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Value::String(format!("Database error: {}", msg)),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, Value::String(msg)),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, Value::String(msg))
            }
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, Value::String(msg)),
        };

        let body = Json(json!({
            "error": error
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Username or email already taken".to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                AppError::Validation("User not found".to_string())
            }
            other => {
                tracing::error!(error = %other, "Database operation failed");
                AppError::DatabaseError(other.to_string())
            }
        }
    }
}
