/// Complete task operation
///
/// `POST /ops/complete_task`: creator or assignee only. Moves the task to
/// `completed`, stamps `completed_at`, and records the result text when
/// one is provided. Completing an already-completed task is rejected with
/// a state conflict and mutates nothing.

use crate::app::AppState;
use crate::error::{OpError, OpResult};
use crate::routes::ops::{parse_task_id, TaskPayload};
use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use taskdesk_shared::auth::middleware::AuthContext;
use taskdesk_shared::models::task::Task;

/// Complete task request
#[derive(Debug, Deserialize)]
pub struct CompleteTaskRequest {
    /// Task id (UUID)
    #[serde(default)]
    pub id: String,

    /// Optional completion result or notes
    pub result: Option<String>,
}

/// `POST /ops/complete_task` handler
pub async fn complete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CompleteTaskRequest>,
) -> OpResult<Json<TaskPayload>> {
    let task_id = parse_task_id(&request.id)?;

    tracing::info!(user_id = %auth.actor.id, task_id = %task_id, "completing task");

    Task::complete(&state.db, task_id, &auth.actor, request.result).await?;

    let detailed = Task::find_detailed(&state.db, task_id)
        .await?
        .ok_or_else(|| OpError::Internal("completed task not readable".to_string()))?;

    Ok(Json(detailed.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_result_is_optional() {
        let request: CompleteTaskRequest =
            serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
        assert_eq!(request.id, "abc");
        assert!(request.result.is_none());
    }
}
