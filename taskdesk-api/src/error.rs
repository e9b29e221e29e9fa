/// Error handling for the API server
///
/// Every named operation returns `Result<T, OpError>`. Per the transport
/// contract, domain errors never surface as transport-level faults: an
/// `OpError` renders as HTTP 200 with a uniform `{"error": "<message>"}`
/// payload, so callers branch on the payload, not the status code. Only
/// genuinely transport-level problems (unroutable path, non-JSON body)
/// produce an HTTP error status.
///
/// # Taxonomy
///
/// - `Auth`: missing / malformed / bad-signature / expired credential
/// - `Permission`: authenticated but not allowed
/// - `Validation`: bad or missing field, bad identifier shape, unknown or
///   duplicate status, limit out of range
/// - `NotFound`: task or user absent
/// - `StateConflict`: illegal transition or archived task
/// - `Conflict`: unique-name violation on user creation
/// - `Internal`: store failure; details are logged, never leaked

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use taskdesk_shared::auth::jwt::JwtError;
use taskdesk_shared::auth::permissions::PermissionError;
use taskdesk_shared::models::task::TaskError;

/// Operation result type alias
pub type OpResult<T> = Result<T, OpError>;

/// Unified operation error type
#[derive(Debug, thiserror::Error)]
pub enum OpError {
    /// Credential problem
    #[error("invalid token: {0}")]
    Auth(#[from] JwtError),

    /// Authenticated but not allowed
    #[error(transparent)]
    Permission(#[from] PermissionError),

    /// Caller-supplied input failed validation
    #[error("{0}")]
    Validation(String),

    /// Referenced task or user does not exist
    #[error("{0}")]
    NotFound(String),

    /// Illegal transition or archived task
    #[error("{0}")]
    StateConflict(String),

    /// Store-level uniqueness conflict
    #[error("{0}")]
    Conflict(String),

    /// Store failure; message is internal detail
    #[error("database error")]
    Internal(String),
}

/// Uniform failure payload
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message
    pub error: String,
}

impl OpError {
    /// Message exposed to the caller
    ///
    /// Internal errors are flattened to a generic message; everything else
    /// renders its display form.
    pub fn public_message(&self) -> String {
        match self {
            OpError::Internal(_) => "database error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for OpError {
    fn into_response(self) -> Response {
        if let OpError::Internal(detail) = &self {
            tracing::error!(detail = %detail, "operation failed on store error");
        }

        let body = Json(ErrorBody {
            error: self.public_message(),
        });

        (StatusCode::OK, body).into_response()
    }
}

impl From<sqlx::Error> for OpError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => OpError::NotFound("resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    if constraint == "users_name_unique" {
                        return OpError::Conflict("user with this name already exists".to_string());
                    }
                    return OpError::Conflict(format!("constraint violation: {}", constraint));
                }
                OpError::Internal(err.to_string())
            }
            _ => OpError::Internal(err.to_string()),
        }
    }
}

impl From<TaskError> for OpError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound => OpError::NotFound("task not found".to_string()),
            TaskError::Permission(denied) => OpError::Permission(denied),
            TaskError::Archived => OpError::StateConflict(err.to_string()),
            TaskError::InvalidTransition { .. } => OpError::StateConflict(err.to_string()),
            TaskError::Validation(message) => OpError::Validation(message),
            TaskError::Database(db) => db.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdesk_shared::models::task::{TaskAction, TaskStatus};

    #[test]
    fn test_task_error_mapping() {
        let err: OpError = TaskError::NotFound.into();
        assert!(matches!(err, OpError::NotFound(_)));
        assert_eq!(err.public_message(), "task not found");

        let err: OpError = TaskError::Archived.into();
        assert!(matches!(err, OpError::StateConflict(_)));
        assert_eq!(err.public_message(), "cannot modify archived task");

        let err: OpError = TaskError::InvalidTransition {
            from: TaskStatus::Completed,
            action: TaskAction::Complete,
        }
        .into();
        assert_eq!(err.public_message(), "task is already completed");
    }

    #[test]
    fn test_permission_error_message() {
        let err: OpError = PermissionError::NotTaskParty.into();
        assert!(err.public_message().starts_with("permission denied"));
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err = OpError::Internal("connection reset by peer".to_string());
        assert_eq!(err.public_message(), "database error");
    }

    #[test]
    fn test_auth_error_message() {
        let err: OpError = JwtError::Expired.into();
        assert_eq!(err.public_message(), "invalid token: token has expired");
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody {
            error: "task not found".to_string(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"error":"task not found"}"#);
    }
}
