/// Wait-for-user operation
///
/// `POST /ops/wait_for_user`: creator or assignee only. Parks the task in
/// `waiting_for_user` and appends the mandatory comment to the task's
/// ledger. The status change and the comment row commit together or not at
/// all.
///
/// # Example Response
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "status": "waiting_for_user",
///   "...": "...",
///   "comment_added": {
///     "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
///     "comment": "need the VPN credentials to proceed",
///     "created_at": "2026-08-06T12:00:00Z"
///   }
/// }
/// ```

use crate::app::AppState;
use crate::error::{OpError, OpResult};
use crate::routes::ops::{parse_task_id, require_field, TaskPayload};
use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskdesk_shared::auth::middleware::AuthContext;
use taskdesk_shared::models::task::Task;
use uuid::Uuid;

/// Wait-for-user request
#[derive(Debug, Deserialize)]
pub struct WaitForUserRequest {
    /// Task id (UUID)
    #[serde(default)]
    pub id: String,

    /// Why the task needs user attention
    #[serde(default)]
    pub comment: String,
}

/// The comment written by this transition
#[derive(Debug, Serialize)]
pub struct CommentAdded {
    /// Comment id
    pub id: Uuid,

    /// Comment text
    pub comment: String,

    /// When the comment was written
    pub created_at: DateTime<Utc>,
}

/// Wait-for-user response: the updated task plus the appended comment
#[derive(Debug, Serialize)]
pub struct WaitForUserResponse {
    #[serde(flatten)]
    pub task: TaskPayload,

    /// The ledger row created by this call
    pub comment_added: CommentAdded,
}

/// `POST /ops/wait_for_user` handler
pub async fn wait_for_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<WaitForUserRequest>,
) -> OpResult<Json<WaitForUserResponse>> {
    let task_id = parse_task_id(&request.id)?;
    let comment = require_field(&request.comment, "comment is required")?;

    tracing::info!(user_id = %auth.actor.id, task_id = %task_id, "parking task on user input");

    let (_, comment_row) = Task::wait_for_user(&state.db, task_id, &auth.actor, comment).await?;

    let detailed = Task::find_detailed(&state.db, task_id)
        .await?
        .ok_or_else(|| OpError::Internal("updated task not readable".to_string()))?;

    Ok(Json(WaitForUserResponse {
        task: detailed.into(),
        comment_added: CommentAdded {
            id: comment_row.id,
            comment: comment_row.comment,
            created_at: comment_row.created_at,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_flattens_task_fields() {
        let response = WaitForUserResponse {
            task: TaskPayload {
                id: Uuid::new_v4(),
                description: "check the deploy".to_string(),
                status: "waiting_for_user".to_string(),
                created_by: Uuid::new_v4(),
                created_by_name: "admin".to_string(),
                assigned_to: Uuid::new_v4(),
                assigned_to_name: "alice".to_string(),
                result: None,
                is_archived: false,
                created_at: Utc::now(),
                updated_at: Utc::now(),
                completed_at: None,
                archived_at: None,
            },
            comment_added: CommentAdded {
                id: Uuid::new_v4(),
                comment: "waiting on approval".to_string(),
                created_at: Utc::now(),
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "waiting_for_user");
        assert_eq!(json["comment_added"]["comment"], "waiting on approval");
    }
}
