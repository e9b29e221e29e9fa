/// Generate token operation
///
/// `POST /ops/generate_token`: admin only. Re-issues a credential for an
/// existing user, with the role flag read from the stored user record, not
/// from the request.

use crate::app::AppState;
use crate::error::{OpError, OpResult};
use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskdesk_shared::auth::jwt::{create_token, Claims};
use taskdesk_shared::auth::middleware::AuthContext;
use taskdesk_shared::auth::permissions::require_admin;
use taskdesk_shared::models::user::User;
use uuid::Uuid;

/// Generate token request
#[derive(Debug, Deserialize)]
pub struct GenerateTokenRequest {
    /// User id to issue the credential for
    #[serde(default)]
    pub user_id: String,
}

/// Generate token response
#[derive(Debug, Serialize)]
pub struct GenerateTokenResponse {
    /// The issued credential
    pub token: String,

    /// Subject user id
    pub user_id: Uuid,

    /// Subject user name
    pub name: String,

    /// Role flag embedded in the credential
    pub is_admin: bool,

    /// When the credential expires
    pub expires_at: DateTime<Utc>,
}

/// `POST /ops/generate_token` handler
pub async fn generate_token(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<GenerateTokenRequest>,
) -> OpResult<Json<GenerateTokenResponse>> {
    require_admin(&auth.actor, "only admins can generate tokens for users")?;

    let raw = super::require_field(&request.user_id, "user ID is required")?;
    let user_id = Uuid::parse_str(raw)
        .map_err(|_| OpError::Validation("invalid user ID format".to_string()))?;

    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| OpError::NotFound("user not found".to_string()))?;

    tracing::info!(admin_id = %auth.actor.id, user_id = %user.id, "issuing token");

    let claims = Claims::with_ttl(user.id, user.is_admin, state.token_ttl());
    let token = create_token(&claims, state.jwt_secret())?;

    let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
        .ok_or_else(|| OpError::Internal("claim timestamp out of range".to_string()))?;

    Ok(Json(GenerateTokenResponse {
        token,
        user_id: user.id,
        name: user.name,
        is_admin: user.is_admin,
        expires_at,
    }))
}
