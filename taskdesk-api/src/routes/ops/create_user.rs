/// Create user operation
///
/// `POST /ops/create_user`: admin only. Creates a user with a unique name
/// and answers with a freshly issued credential for the new user, so an
/// admin can hand out access in one step.
///
/// # Example Response
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "name": "alice",
///   "is_admin": false,
///   "token": "eyJhbGciOiJIUzI1NiJ9...",
///   "created_at": "2026-08-06T12:00:00Z"
/// }
/// ```

use crate::app::AppState;
use crate::error::{OpError, OpResult};
use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskdesk_shared::auth::jwt::{create_token, Claims};
use taskdesk_shared::auth::middleware::AuthContext;
use taskdesk_shared::auth::permissions::require_admin;
use taskdesk_shared::models::user::{CreateUser, User};
use uuid::Uuid;
use validator::Validate;

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Unique display name for the new user
    #[serde(default)]
    #[validate(length(max = 255, message = "name must be at most 255 characters"))]
    pub name: String,

    /// Whether the new user gets the admin role
    #[serde(default)]
    pub is_admin: bool,
}

/// Create user response
#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    /// New user id
    pub id: Uuid,

    /// New user name
    pub name: String,

    /// Role flag
    pub is_admin: bool,

    /// Credential issued for the new user
    pub token: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// `POST /ops/create_user` handler
pub async fn create_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreateUserRequest>,
) -> OpResult<Json<CreateUserResponse>> {
    require_admin(&auth.actor, "only admins can create users")?;

    super::validate_request(&request)?;
    let name = super::require_field(&request.name, "name is required")?;

    tracing::info!(admin_id = %auth.actor.id, name = %name, "creating user");

    let user = User::create(
        &state.db,
        CreateUser {
            name: name.to_string(),
            is_admin: request.is_admin,
        },
    )
    .await
    .map_err(|e| match OpError::from(e) {
        OpError::Conflict(_) => {
            OpError::Conflict(format!("user with name '{}' already exists", name))
        }
        other => other,
    })?;

    let claims = Claims::with_ttl(user.id, user.is_admin, state.token_ttl());
    let token = create_token(&claims, state.jwt_secret())?;

    Ok(Json(CreateUserResponse {
        id: user.id,
        name: user.name,
        is_admin: user.is_admin,
        token,
        created_at: user.created_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request: CreateUserRequest = serde_json::from_str(r#"{"name": "alice"}"#).unwrap();
        assert_eq!(request.name, "alice");
        assert!(!request.is_admin);
    }

    #[test]
    fn test_response_serialization() {
        let response = CreateUserResponse {
            id: Uuid::new_v4(),
            name: "alice".to_string(),
            is_admin: false,
            token: "token".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["name"], "alice");
        assert_eq!(json["is_admin"], false);
        assert_eq!(json["token"], "token");
    }
}
