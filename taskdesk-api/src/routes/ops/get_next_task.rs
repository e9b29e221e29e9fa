/// Get next task operation
///
/// `POST /ops/get_next_task`: returns the single oldest non-archived task
/// where the caller is creator or assignee and the status matches the
/// filter (default: `pending` only). Finding nothing is a normal outcome,
/// answered with an explicit null, never an error.

use crate::app::AppState;
use crate::error::OpResult;
use crate::routes::ops::TaskPayload;
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use taskdesk_shared::auth::middleware::AuthContext;
use taskdesk_shared::models::task::{parse_status, Task, TaskStatus};

/// Get next task request
#[derive(Debug, Default, Deserialize)]
pub struct GetNextTaskRequest {
    /// Statuses to match; defaults to `["pending"]`
    pub statuses: Option<Vec<String>>,
}

/// Get next task response
#[derive(Debug, Serialize)]
pub struct GetNextTaskResponse {
    /// The oldest matching task, or null when none matches
    pub task: Option<TaskPayload>,
}

/// `POST /ops/get_next_task` handler
pub async fn get_next_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    request: Option<Json<GetNextTaskRequest>>,
) -> OpResult<Json<GetNextTaskResponse>> {
    let request = request.map(|Json(r)| r).unwrap_or_default();

    let statuses: Vec<TaskStatus> = match request.statuses {
        Some(values) if !values.is_empty() => {
            let mut parsed = Vec::with_capacity(values.len());
            for value in &values {
                parsed.push(parse_status(value)?);
            }
            parsed
        }
        _ => vec![TaskStatus::Pending],
    };

    let task = Task::next_for_actor(&state.db, auth.actor.id, &statuses).await?;

    Ok(Json(GetNextTaskResponse {
        task: task.map(TaskPayload::from),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_result_serializes_as_null() {
        let response = GetNextTaskResponse { task: None };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"task":null}"#);
    }
}
