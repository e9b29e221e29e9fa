/// Named-operation endpoints
///
/// One module per operation, mirroring the operation names on the wire:
///
/// - `POST /ops/create_user`: create a user (admin only)
/// - `POST /ops/generate_token`: issue a credential for a user (admin only)
/// - `POST /ops/get_token_info`: inspect the caller's credential
/// - `POST /ops/list_users`: list users by name
/// - `POST /ops/create_task`: create a task assigned to a user
/// - `POST /ops/complete_task`: finish a task, optionally with a result
/// - `POST /ops/cancel_task`: abandon a task with a reason
/// - `POST /ops/wait_for_user`: park a task on user input with a comment
/// - `POST /ops/get_next_task`: oldest matching task for the caller
/// - `POST /ops/list_created_tasks`: page of tasks the target user created
///
/// # Authentication
///
/// Every operation requires a bearer credential in the Authorization
/// header; the argument body never carries identity. Success responses are
/// operation-specific; every failure is the uniform `{"error": "..."}`
/// payload.

use crate::error::OpError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use taskdesk_shared::models::task::TaskWithNames;
use uuid::Uuid;

pub mod cancel_task;
pub mod complete_task;
pub mod create_task;
pub mod create_user;
pub mod generate_token;
pub mod get_next_task;
pub mod list_created_tasks;
pub mod list_users;
pub mod token_info;
pub mod wait_for_user;

/// Task representation returned by the task operations
///
/// Ids and display names are carried for both parties so callers need no
/// follow-up lookups. Optional timestamps are omitted when unset.
#[derive(Debug, Clone, Serialize)]
pub struct TaskPayload {
    pub id: Uuid,
    pub description: String,
    pub status: String,
    pub created_by: Uuid,
    pub created_by_name: String,
    pub assigned_to: Uuid,
    pub assigned_to_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
}

impl From<TaskWithNames> for TaskPayload {
    fn from(task: TaskWithNames) -> Self {
        Self {
            id: task.id,
            description: task.description,
            status: task.status,
            created_by: task.created_by,
            created_by_name: task.created_by_name,
            assigned_to: task.assigned_to,
            assigned_to_name: task.assigned_to_name,
            result: task.result,
            is_archived: task.is_archived,
            created_at: task.created_at,
            updated_at: task.updated_at,
            completed_at: task.completed_at,
            archived_at: task.archived_at,
        }
    }
}

/// Parses a caller-supplied task id
///
/// Missing and malformed ids are distinct validation failures, reported
/// before any store access.
pub(crate) fn parse_task_id(raw: &str) -> Result<Uuid, OpError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(OpError::Validation("task ID is required".to_string()));
    }
    Uuid::parse_str(trimmed).map_err(|_| OpError::Validation("invalid task ID format".to_string()))
}

/// Requires a non-blank string field
pub(crate) fn require_field<'a>(value: &'a str, message: &str) -> Result<&'a str, OpError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(OpError::Validation(message.to_string()));
    }
    Ok(trimmed)
}

/// Runs derive-based request validation, mapping failures into the
/// uniform validation error
pub(crate) fn validate_request<T: validator::Validate>(req: &T) -> Result<(), OpError> {
    req.validate()
        .map_err(|errors| OpError::Validation(errors.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_task_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_task_id(&id.to_string()).unwrap(), id);
        assert_eq!(parse_task_id(&format!("  {}  ", id)).unwrap(), id);

        let err = parse_task_id("").unwrap_err();
        assert_eq!(err.public_message(), "task ID is required");

        let err = parse_task_id("not-a-uuid").unwrap_err();
        assert_eq!(err.public_message(), "invalid task ID format");
    }

    #[test]
    fn test_require_field() {
        assert_eq!(require_field(" x ", "msg").unwrap(), "x");
        let err = require_field("  ", "comment is required").unwrap_err();
        assert_eq!(err.public_message(), "comment is required");
    }

    #[test]
    fn test_task_payload_omits_unset_timestamps() {
        let payload = TaskPayload {
            id: Uuid::new_v4(),
            description: "write release notes".to_string(),
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
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("result").is_none());
        assert!(json.get("completed_at").is_none());
        assert_eq!(json["status"], "pending");
        assert_eq!(json["assigned_to_name"], "alice");
    }
}
