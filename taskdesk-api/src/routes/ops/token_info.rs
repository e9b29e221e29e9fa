/// Token info operation
///
/// `POST /ops/get_token_info`: echoes the caller's validated claims plus
/// the stored user record and the credential's remaining validity. Takes
/// no arguments; the body may be omitted entirely.

use crate::app::AppState;
use crate::error::{OpError, OpResult};
use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use taskdesk_shared::auth::middleware::AuthContext;
use taskdesk_shared::models::user::User;
use uuid::Uuid;

/// Token info response
#[derive(Debug, Serialize)]
pub struct TokenInfoResponse {
    /// Subject user id
    pub user_id: Uuid,

    /// Subject user name, from the store
    pub user_name: String,

    /// Role flag carried by the credential
    pub is_admin: bool,

    /// When the credential was issued
    pub issued_at: DateTime<Utc>,

    /// When the credential expires
    pub expires_at: DateTime<Utc>,

    /// Remaining validity, human formatted
    pub remaining_time: String,
}

/// Formats a remaining-validity window as days/hours/minutes
fn format_remaining(remaining: Duration) -> String {
    if remaining <= Duration::zero() {
        return "0 days, 0 hours, 0 minutes".to_string();
    }
    format!(
        "{} days, {} hours, {} minutes",
        remaining.num_days(),
        remaining.num_hours() % 24,
        remaining.num_minutes() % 60,
    )
}

/// `POST /ops/get_token_info` handler
pub async fn get_token_info(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> OpResult<Json<TokenInfoResponse>> {
    let user = User::find_by_id(&state.db, auth.actor.id)
        .await?
        .ok_or_else(|| OpError::NotFound("user not found".to_string()))?;

    let issued_at = DateTime::<Utc>::from_timestamp(auth.claims.iat, 0)
        .ok_or_else(|| OpError::Internal("claim timestamp out of range".to_string()))?;
    let expires_at = DateTime::<Utc>::from_timestamp(auth.claims.exp, 0)
        .ok_or_else(|| OpError::Internal("claim timestamp out of range".to_string()))?;

    Ok(Json(TokenInfoResponse {
        user_id: user.id,
        user_name: user.name,
        is_admin: auth.actor.is_admin,
        issued_at,
        expires_at,
        remaining_time: format_remaining(expires_at - Utc::now()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_remaining() {
        let d = Duration::days(1) + Duration::hours(3) + Duration::minutes(7);
        assert_eq!(format_remaining(d), "1 days, 3 hours, 7 minutes");

        assert_eq!(
            format_remaining(Duration::minutes(59)),
            "0 days, 0 hours, 59 minutes"
        );
    }

    #[test]
    fn test_format_remaining_clamps_at_zero() {
        assert_eq!(
            format_remaining(Duration::seconds(-5)),
            "0 days, 0 hours, 0 minutes"
        );
    }
}
