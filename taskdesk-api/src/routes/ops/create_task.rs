/// Create task operation
///
/// `POST /ops/create_task`: any authenticated actor. The creator is
/// always the credential subject, never caller-supplied input; the
/// assignee is resolved by exact name match. New tasks start in `pending`
/// and unarchived, with a fresh random id.
///
/// # Example Request
///
/// ```json
/// {
///   "description": "rotate the staging database credentials",
///   "assigned_to": "alice"
/// }
/// ```

use crate::app::AppState;
use crate::error::{OpError, OpResult};
use crate::routes::ops::TaskPayload;
use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use taskdesk_shared::auth::middleware::AuthContext;
use taskdesk_shared::models::task::{CreateTask, Task};
use taskdesk_shared::models::user::User;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// What needs to be done
    #[serde(default)]
    #[validate(length(max = 10000, message = "description must be at most 10000 characters"))]
    pub description: String,

    /// Name of the user to assign the task to
    #[serde(default)]
    #[validate(length(max = 255, message = "assigned_to must be at most 255 characters"))]
    pub assigned_to: String,
}

/// `POST /ops/create_task` handler
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreateTaskRequest>,
) -> OpResult<Json<TaskPayload>> {
    super::validate_request(&request)?;
    let description = super::require_field(&request.description, "description is required")?;
    let assignee_name = super::require_field(&request.assigned_to, "assigned_to is required")?;

    let assignee = User::find_by_name(&state.db, assignee_name)
        .await?
        .ok_or_else(|| OpError::NotFound(format!("user '{}' does not exist", assignee_name)))?;

    tracing::info!(
        user_id = %auth.actor.id,
        assigned_to = %assignee.id,
        "creating task"
    );

    let task = Task::create(
        &state.db,
        CreateTask {
            description: description.to_string(),
            created_by: auth.actor.id,
            assigned_to: assignee.id,
        },
    )
    .await?;

    let detailed = Task::find_detailed(&state.db, task.id)
        .await?
        .ok_or_else(|| OpError::Internal("created task not readable".to_string()))?;

    Ok(Json(detailed.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_to_empty_fields() {
        let request: CreateTaskRequest = serde_json::from_str("{}").unwrap();
        assert!(request.description.is_empty());
        assert!(request.assigned_to.is_empty());
    }
}
