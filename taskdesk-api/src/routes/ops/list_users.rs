/// List users operation
///
/// `POST /ops/list_users`: lists users ordered by name. Any authenticated
/// actor may call it; assigning a task requires knowing who exists.

use crate::app::AppState;
use crate::error::{OpError, OpResult};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use taskdesk_shared::auth::middleware::AuthContext;
use taskdesk_shared::models::user::User;

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 1000;

/// List users request
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersRequest {
    /// Maximum number of users to return (default: 100, max: 1000)
    pub limit: Option<i64>,
}

/// List users response
#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    /// Users ordered by name
    pub users: Vec<User>,

    /// Number of users returned
    pub count: usize,

    /// Limit applied
    pub limit: i64,
}

/// `POST /ops/list_users` handler
pub async fn list_users(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
    request: Option<Json<ListUsersRequest>>,
) -> OpResult<Json<ListUsersResponse>> {
    let request = request.map(|Json(r)| r).unwrap_or_default();

    let limit = match request.limit {
        None => DEFAULT_LIMIT,
        Some(value) if value <= 0 => {
            return Err(OpError::Validation("limit must be positive".to_string()))
        }
        Some(value) if value > MAX_LIMIT => {
            return Err(OpError::Validation("limit cannot exceed 1000".to_string()))
        }
        Some(value) => value,
    };

    let users = User::list(&state.db, limit).await?;
    let count = users.len();

    Ok(Json(ListUsersResponse {
        users,
        count,
        limit,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_default_has_no_limit() {
        let request = ListUsersRequest::default();
        assert!(request.limit.is_none());
    }
}
