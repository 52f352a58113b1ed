use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::types::{SessionClaims, SessionToken};
use crate::shared::{AppError, AppState};

/// HTTP handler for ending a session
///
/// POST /logout
/// Revokes the token that authenticated this request
#[instrument(name = "logout", skip(state, token, claims), fields(user_id = claims.user_id))]
pub async fn logout(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Extension(SessionToken(token)): Extension<SessionToken>,
) -> Result<Json<Value>, AppError> {
    state.session_service.revoke_session(&token, &claims).await;

    info!(username = %claims.username, "User logged out");

    Ok(Json(json!({ "message": "Logged out successfully" })))
}
