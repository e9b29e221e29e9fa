/// List created tasks operation
///
/// `POST /ops/list_created_tasks`: pages through tasks created by the
/// target user, newest first, each with its full ordered comment history.
/// The target defaults to the caller; naming another user requires admin.
/// `total_count` reflects the whole filtered set regardless of the page
/// limit. A failure to fetch one task's comments degrades that task to an
/// empty comment list instead of failing the listing.

use crate::app::AppState;
use crate::error::{OpError, OpResult};
use crate::routes::ops::TaskPayload;
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use taskdesk_shared::auth::middleware::AuthContext;
use taskdesk_shared::auth::permissions::require_admin;
use taskdesk_shared::models::comment::{TaskComment, TaskCommentWithAuthor};
use taskdesk_shared::models::task::{parse_status_filter, Task, TaskStatus};
use taskdesk_shared::models::user::User;
use uuid::Uuid;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 1000;

/// List created tasks request
#[derive(Debug, Default, Deserialize)]
pub struct ListCreatedTasksRequest {
    /// Username to list tasks for; defaults to the caller. Only admins may
    /// name another user.
    pub user_name: Option<String>,

    /// Maximum number of tasks to return (default: 50, max: 1000)
    pub limit: Option<i64>,

    /// Statuses to filter by; omitted means all statuses
    pub statuses: Option<Vec<String>>,
}

/// One listed task with its comment history
#[derive(Debug, Serialize)]
pub struct ListedTask {
    #[serde(flatten)]
    pub task: TaskPayload,

    /// Full comment history, oldest first
    pub comments: Vec<TaskCommentWithAuthor>,
}

/// List created tasks response
#[derive(Debug, Serialize)]
pub struct ListCreatedTasksResponse {
    /// The requested page, newest first
    pub tasks: Vec<ListedTask>,

    /// Matching tasks in total, unaffected by the limit
    pub total_count: i64,

    /// Limit applied to this page
    pub limit_used: i64,

    /// Target user's display name
    pub created_by: String,

    /// Target user's id
    pub created_by_id: Uuid,
}

/// `POST /ops/list_created_tasks` handler
pub async fn list_created_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    request: Option<Json<ListCreatedTasksRequest>>,
) -> OpResult<Json<ListCreatedTasksResponse>> {
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

    let statuses: Vec<TaskStatus> = match &request.statuses {
        Some(values) if !values.is_empty() => parse_status_filter(values)?,
        _ => Vec::new(),
    };

    // Resolve the target user; naming someone else is an admin privilege
    let target = match request.user_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => {
            require_admin(&auth.actor, "only admins can view tasks created by other users")?;
            User::find_by_name(&state.db, name)
                .await?
                .ok_or_else(|| OpError::NotFound(format!("user not found: {}", name)))?
        }
        _ => User::find_by_id(&state.db, auth.actor.id)
            .await?
            .ok_or_else(|| OpError::NotFound("user not found".to_string()))?,
    };

    let total_count = Task::count_created_by(&state.db, target.id, &statuses).await?;
    let page = Task::list_created_by(&state.db, target.id, &statuses, limit).await?;

    let mut tasks = Vec::with_capacity(page.len());
    for task in page {
        let comments = match TaskComment::list_for_task(&state.db, task.id).await {
            Ok(comments) => comments,
            Err(e) => {
                // Comments are auxiliary; degrade rather than fail the page
                tracing::warn!(task_id = %task.id, error = %e, "failed to fetch task comments");
                Vec::new()
            }
        };
        tasks.push(ListedTask {
            task: task.into(),
            comments,
        });
    }

    Ok(Json(ListCreatedTasksResponse {
        tasks,
        total_count,
        limit_used: limit,
        created_by: target.name,
        created_by_id: target.id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request: ListCreatedTasksRequest = serde_json::from_str("{}").unwrap();
        assert!(request.user_name.is_none());
        assert!(request.limit.is_none());
        assert!(request.statuses.is_none());
    }

    #[test]
    fn test_listed_task_flattens_payload() {
        use chrono::Utc;

        let listed = ListedTask {
            task: TaskPayload {
                id: Uuid::new_v4(),
                description: "triage the backlog".to_string(),
                status: "pending".to_string(),
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
            comments: Vec::new(),
        };

        let json = serde_json::to_value(&listed).unwrap();
        assert_eq!(json["description"], "triage the backlog");
        assert!(json["comments"].as_array().unwrap().is_empty());
    }
}
