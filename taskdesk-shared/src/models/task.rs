/// Task model, lifecycle state machine, and database operations
///
/// Tasks are the core entity of TaskDesk: work assigned by one user to
/// another, moved through a closed set of statuses by the named operations.
///
/// # State machine
///
/// ```text
/// pending ─────────────┬─> completed
/// in_progress ─────────┤
/// waiting_for_user ────┘
///
/// pending ─────────────┬─> cancelled
/// in_progress ─────────┤
/// waiting_for_user ────┘
///
/// pending ─────────────┬─> waiting_for_user (+ one comment row, atomically)
/// in_progress ─────────┘
/// ```
///
/// `completed` and `cancelled` are terminal. `is_archived` is an orthogonal
/// permanent lock: once set it blocks every transition regardless of
/// status. No operation in the current surface sets it, or moves a task to
/// `in_progress`; both remain first-class states reachable only out of
/// band.
///
/// # Concurrency
///
/// Every transition is a single conditional `UPDATE` restricted to the
/// allowed source statuses, the non-archived state, and the task's parties.
/// Zero rows affected is the authoritative rejection signal; the rejection
/// is then classified by one follow-up read walked through the guard order
/// (exists, permission, archived, status). Two concurrent terminal
/// transitions therefore resolve to exactly one success and one
/// `StateConflict`, never a double apply.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY,
///     description TEXT NOT NULL,
///     status TEXT NOT NULL DEFAULT 'pending',
///     created_by UUID NOT NULL REFERENCES users(id),
///     assigned_to UUID NOT NULL REFERENCES users(id),
///     is_archived BOOLEAN NOT NULL DEFAULT FALSE,
///     result TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     completed_at TIMESTAMPTZ,
///     archived_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::permissions::{require_task_party, Actor, PermissionError};
use crate::models::comment::TaskComment;

/// Task lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Newly created, waiting to be picked up
    Pending,

    /// Being worked on
    InProgress,

    /// Blocked on input from a user; always paired with a comment
    WaitingForUser,

    /// Finished successfully (terminal)
    Completed,

    /// Abandoned with a reason (terminal)
    Cancelled,
}

impl TaskStatus {
    /// The closed enumeration, in declaration order
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::WaitingForUser,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
    ];

    /// Wire/database representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::WaitingForUser => "waiting_for_user",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    /// Human wording used in error messages
    pub fn describe(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in progress",
            TaskStatus::WaitingForUser => "waiting for user",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    /// Parses a wire value; `None` for anything outside the enumeration
    pub fn parse(value: &str) -> Option<TaskStatus> {
        TaskStatus::ALL.into_iter().find(|s| s.as_str() == value)
    }

    /// Terminal statuses define no outgoing transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Cancelled)
    }
}

/// A lifecycle action requested by a caller
///
/// The transition table is keyed by (current status, action):
/// [`TaskAction::allowed_sources`] lists the statuses an action may fire
/// from, [`TaskAction::target`] the status it produces. Any pair outside
/// the table is rejected centrally by [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    /// Finish the task, optionally recording a result
    Complete,

    /// Abandon the task, recording a mandatory reason
    Cancel,

    /// Park the task on user input, recording a mandatory comment
    WaitForUser,
}

impl TaskAction {
    /// Status this action produces
    pub fn target(&self) -> TaskStatus {
        match self {
            TaskAction::Complete => TaskStatus::Completed,
            TaskAction::Cancel => TaskStatus::Cancelled,
            TaskAction::WaitForUser => TaskStatus::WaitingForUser,
        }
    }

    /// Statuses this action may fire from
    pub fn allowed_sources(&self) -> &'static [TaskStatus] {
        match self {
            TaskAction::Complete | TaskAction::Cancel => &[
                TaskStatus::Pending,
                TaskStatus::InProgress,
                TaskStatus::WaitingForUser,
            ],
            TaskAction::WaitForUser => &[TaskStatus::Pending, TaskStatus::InProgress],
        }
    }

    /// SQL literal list of the allowed source statuses
    fn sources_sql(&self) -> String {
        self.allowed_sources()
            .iter()
            .map(|s| format!("'{}'", s.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Error message for an illegal (status, action) pair
fn transition_conflict(from: &TaskStatus, action: &TaskAction) -> String {
    if *from == action.target() {
        return format!("task is already {}", from.describe());
    }
    match action {
        TaskAction::WaitForUser => format!("cannot send {} task to waiting", from.describe()),
        TaskAction::Complete => format!("cannot complete {} task", from.describe()),
        TaskAction::Cancel => format!("cannot cancel {} task", from.describe()),
    }
}

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// No task row with the requested id
    #[error("task not found")]
    NotFound,

    /// Actor may not act on this task
    #[error(transparent)]
    Permission(#[from] PermissionError),

    /// The archival lock blocks every transition
    #[error("cannot modify archived task")]
    Archived,

    /// (current status, action) pair outside the transition table
    #[error("{}", transition_conflict(.from, .action))]
    InvalidTransition {
        /// Status observed on the task
        from: TaskStatus,
        /// Action that was requested
        action: TaskAction,
    },

    /// Caller-supplied value failed validation
    #[error("{0}")]
    Validation(String),

    /// Store failure
    #[error("database error")]
    Database(#[from] sqlx::Error),
}

/// Parses one status value, rejecting anything outside the enumeration
pub fn parse_status(value: &str) -> Result<TaskStatus, TaskError> {
    TaskStatus::parse(value).ok_or_else(|| {
        TaskError::Validation(format!(
            "invalid status: '{}'. Valid statuses are: pending, in_progress, waiting_for_user, completed, cancelled",
            value
        ))
    })
}

/// Parses a status filter list for listings
///
/// Each entry must be non-blank, within the enumeration, and unique;
/// errors name the offending value.
pub fn parse_status_filter(values: &[String]) -> Result<Vec<TaskStatus>, TaskError> {
    let mut parsed = Vec::with_capacity(values.len());
    for value in values {
        if value.trim().is_empty() {
            return Err(TaskError::Validation("status cannot be empty".to_string()));
        }
        let status = parse_status(value)?;
        if parsed.contains(&status) {
            return Err(TaskError::Validation(format!("duplicate status: '{}'", value)));
        }
        parsed.push(status);
    }
    Ok(parsed)
}

/// Task row as stored
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task id
    pub id: Uuid,

    /// What needs to be done
    pub description: String,

    /// Current lifecycle status (wire form; constrained by the store)
    pub status: String,

    /// User who created the task
    pub created_by: Uuid,

    /// User the task is assigned to
    pub assigned_to: Uuid,

    /// Orthogonal permanent lock
    pub is_archived: bool,

    /// Completion result and/or cancellation trail
    pub result: Option<String>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,

    /// Set only on completion
    pub completed_at: Option<DateTime<Utc>>,

    /// Set only on archival
    pub archived_at: Option<DateTime<Utc>>,
}

/// Task row joined with the display names of both parties
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskWithNames {
    pub id: Uuid,
    pub description: String,
    pub status: String,
    pub created_by: Uuid,
    pub assigned_to: Uuid,
    pub is_archived: bool,
    pub result: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub archived_at: Option<DateTime<Utc>>,

    /// Display name of the creator
    pub created_by_name: String,

    /// Display name of the assignee
    pub assigned_to_name: String,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Task description
    pub description: String,

    /// Creator (always the validated credential subject)
    pub created_by: Uuid,

    /// Assignee (resolved from a user name by the caller)
    pub assigned_to: Uuid,
}

/// Ownership/status snapshot used to classify a rejected transition
#[derive(Debug, Clone, sqlx::FromRow)]
struct TaskSnapshot {
    status: String,
    is_archived: bool,
    created_by: Uuid,
    assigned_to: Uuid,
}

const TASK_COLUMNS: &str = "id, description, status, created_by, assigned_to, is_archived, \
     result, created_at, updated_at, completed_at, archived_at";

const TASK_WITH_NAMES_SELECT: &str = "SELECT t.id, t.description, t.status, t.created_by, t.assigned_to, t.is_archived, \
            t.result, t.created_at, t.updated_at, t.completed_at, t.archived_at, \
            creator.name AS created_by_name, assignee.name AS assigned_to_name \
     FROM tasks t \
     JOIN users creator ON t.created_by = creator.id \
     JOIN users assignee ON t.assigned_to = assignee.id";

/// Classifies a rejected transition against the guard order
///
/// Walked in the fixed order the error taxonomy promises: existence,
/// permission, archival, then status (with `completed` reported before
/// `cancelled`). Pure over an already-fetched snapshot so the ordering is
/// testable without a store.
fn classify(snapshot: Option<&TaskSnapshot>, actor: &Actor, action: TaskAction) -> TaskError {
    let Some(snap) = snapshot else {
        return TaskError::NotFound;
    };

    if let Err(denied) = require_task_party(actor, snap.created_by, snap.assigned_to) {
        return denied.into();
    }

    if snap.is_archived {
        return TaskError::Archived;
    }

    let Some(from) = TaskStatus::parse(&snap.status) else {
        return TaskError::Validation(format!("task has unknown status '{}'", snap.status));
    };

    if from == TaskStatus::Completed {
        return TaskError::InvalidTransition { from, action };
    }
    if from == TaskStatus::Cancelled {
        return TaskError::InvalidTransition { from, action };
    }

    // Covers unmapped non-terminal pairs (e.g. waiting_for_user as a
    // wait_for_user source) and rows that changed between the conditional
    // update and this read.
    TaskError::InvalidTransition { from, action }
}

impl Task {
    /// Creates a new task in `pending` status
    ///
    /// The id is a fresh v4 UUID generated here, never caller-supplied.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the insert.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let sql = format!(
            "INSERT INTO tasks (id, description, status, created_by, assigned_to, is_archived) \
             VALUES ($1, $2, $3, $4, $5, FALSE) \
             RETURNING {TASK_COLUMNS}"
        );

        sqlx::query_as::<_, Task>(&sql)
            .bind(Uuid::new_v4())
            .bind(data.description)
            .bind(TaskStatus::Pending.as_str())
            .bind(data.created_by)
            .bind(data.assigned_to)
            .fetch_one(pool)
            .await
    }

    /// Finds a task by id
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1");

        sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a task by id with both party names resolved
    pub async fn find_detailed(pool: &PgPool, id: Uuid) -> Result<Option<TaskWithNames>, sqlx::Error> {
        let sql = format!("{TASK_WITH_NAMES_SELECT} WHERE t.id = $1");

        sqlx::query_as::<_, TaskWithNames>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Completes a task, optionally recording a result
    ///
    /// Sets `completed_at`; an absent result leaves any existing result
    /// text untouched.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Permission`, `Archived`, or `InvalidTransition` per the
    /// guard order; `Database` on store failure.
    pub async fn complete(
        pool: &PgPool,
        id: Uuid,
        actor: &Actor,
        result: Option<String>,
    ) -> Result<Self, TaskError> {
        let action = TaskAction::Complete;
        let sql = format!(
            "UPDATE tasks \
             SET status = '{target}', result = COALESCE($3, result), \
                 completed_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND (created_by = $2 OR assigned_to = $2) \
               AND is_archived = FALSE AND status IN ({sources}) \
             RETURNING {TASK_COLUMNS}",
            target = action.target().as_str(),
            sources = action.sources_sql(),
        );

        let updated = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(actor.id)
            .bind(result)
            .fetch_optional(pool)
            .await?;

        match updated {
            Some(task) => Ok(task),
            None => Err(Self::classify_rejection(pool, id, actor, action).await?),
        }
    }

    /// Cancels a task, recording the mandatory reason
    ///
    /// The reason is appended to the result field as `[CANCELLED] {reason}`,
    /// after a blank line when result text already exists.
    pub async fn cancel(
        pool: &PgPool,
        id: Uuid,
        actor: &Actor,
        reason: &str,
    ) -> Result<Self, TaskError> {
        let action = TaskAction::Cancel;
        let sql = format!(
            "UPDATE tasks \
             SET status = '{target}', \
                 result = CASE WHEN result IS NULL OR result = '' THEN $3 \
                               ELSE result || E'\\n\\n' || $3 END, \
                 updated_at = NOW() \
             WHERE id = $1 AND (created_by = $2 OR assigned_to = $2) \
               AND is_archived = FALSE AND status IN ({sources}) \
             RETURNING {TASK_COLUMNS}",
            target = action.target().as_str(),
            sources = action.sources_sql(),
        );

        let updated = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(actor.id)
            .bind(format!("[CANCELLED] {}", reason))
            .fetch_optional(pool)
            .await?;

        match updated {
            Some(task) => Ok(task),
            None => Err(Self::classify_rejection(pool, id, actor, action).await?),
        }
    }

    /// Parks a task on user input, appending one comment atomically
    ///
    /// The status change and the comment insert run inside one transaction;
    /// any failure after the first statement rolls both back, leaving
    /// status and comment history exactly as before the call.
    pub async fn wait_for_user(
        pool: &PgPool,
        id: Uuid,
        actor: &Actor,
        comment: &str,
    ) -> Result<(Self, TaskComment), TaskError> {
        let action = TaskAction::WaitForUser;
        let sql = format!(
            "UPDATE tasks SET status = '{target}', updated_at = NOW() \
             WHERE id = $1 AND (created_by = $2 OR assigned_to = $2) \
               AND is_archived = FALSE AND status IN ({sources}) \
             RETURNING {TASK_COLUMNS}",
            target = action.target().as_str(),
            sources = action.sources_sql(),
        );

        let mut tx = pool.begin().await.map_err(TaskError::Database)?;

        let updated = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(actor.id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(task) = updated else {
            // Dropping the open transaction rolls it back
            drop(tx);
            return Err(Self::classify_rejection(pool, id, actor, action).await?);
        };

        let comment = TaskComment::append(&mut *tx, id, actor.id, comment).await?;

        tx.commit().await.map_err(TaskError::Database)?;

        Ok((task, comment))
    }

    /// Returns the oldest matching task where the actor is a party
    ///
    /// Non-archived tasks only, ascending creation order; absence is not an
    /// error, the caller renders an explicit "none" result.
    pub async fn next_for_actor(
        pool: &PgPool,
        actor_id: Uuid,
        statuses: &[TaskStatus],
    ) -> Result<Option<TaskWithNames>, sqlx::Error> {
        let wire: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();

        let sql = format!(
            "{TASK_WITH_NAMES_SELECT} \
             WHERE t.is_archived = FALSE \
               AND t.status = ANY($2) \
               AND (t.created_by = $1 OR t.assigned_to = $1) \
             ORDER BY t.created_at ASC \
             LIMIT 1"
        );

        sqlx::query_as::<_, TaskWithNames>(&sql)
            .bind(actor_id)
            .bind(wire)
            .fetch_optional(pool)
            .await
    }

    /// Counts tasks created by a user, optionally filtered by status
    ///
    /// Used for the listing's total count, which is unaffected by the page
    /// limit.
    pub async fn count_created_by(
        pool: &PgPool,
        user_id: Uuid,
        statuses: &[TaskStatus],
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = if statuses.is_empty() {
            sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE created_by = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?
        } else {
            let wire: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();
            sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE created_by = $1 AND status = ANY($2)")
                .bind(user_id)
                .bind(wire)
                .fetch_one(pool)
                .await?
        };

        Ok(count)
    }

    /// Lists tasks created by a user, newest first
    pub async fn list_created_by(
        pool: &PgPool,
        user_id: Uuid,
        statuses: &[TaskStatus],
        limit: i64,
    ) -> Result<Vec<TaskWithNames>, sqlx::Error> {
        if statuses.is_empty() {
            let sql = format!(
                "{TASK_WITH_NAMES_SELECT} \
                 WHERE t.created_by = $1 \
                 ORDER BY t.created_at DESC \
                 LIMIT $2"
            );
            sqlx::query_as::<_, TaskWithNames>(&sql)
                .bind(user_id)
                .bind(limit)
                .fetch_all(pool)
                .await
        } else {
            let wire: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();
            let sql = format!(
                "{TASK_WITH_NAMES_SELECT} \
                 WHERE t.created_by = $1 AND t.status = ANY($2) \
                 ORDER BY t.created_at DESC \
                 LIMIT $3"
            );
            sqlx::query_as::<_, TaskWithNames>(&sql)
                .bind(user_id)
                .bind(wire)
                .bind(limit)
                .fetch_all(pool)
                .await
        }
    }

    /// Fetches a snapshot and classifies why a conditional update matched
    /// zero rows
    async fn classify_rejection(
        pool: &PgPool,
        id: Uuid,
        actor: &Actor,
        action: TaskAction,
    ) -> Result<TaskError, TaskError> {
        let snapshot = sqlx::query_as::<_, TaskSnapshot>(
            "SELECT status, is_archived, created_by, assigned_to FROM tasks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(classify(snapshot.as_ref(), actor, action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_roundtrip() {
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::parse("archived"), None);
        assert_eq!(TaskStatus::parse(""), None);
        assert_eq!(TaskStatus::parse("Pending"), None);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Cancelled.is_terminal());
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::InProgress.is_terminal());
        assert!(!TaskStatus::WaitingForUser.is_terminal());
    }

    #[test]
    fn test_transition_table() {
        for action in [TaskAction::Complete, TaskAction::Cancel] {
            let sources = action.allowed_sources();
            assert!(sources.contains(&TaskStatus::Pending));
            assert!(sources.contains(&TaskStatus::InProgress));
            assert!(sources.contains(&TaskStatus::WaitingForUser));
        }

        // wait_for_user cannot re-fire from waiting_for_user
        let sources = TaskAction::WaitForUser.allowed_sources();
        assert!(sources.contains(&TaskStatus::Pending));
        assert!(sources.contains(&TaskStatus::InProgress));
        assert!(!sources.contains(&TaskStatus::WaitingForUser));

        // terminal statuses are never a source
        for action in [TaskAction::Complete, TaskAction::Cancel, TaskAction::WaitForUser] {
            assert!(!action.allowed_sources().contains(&TaskStatus::Completed));
            assert!(!action.allowed_sources().contains(&TaskStatus::Cancelled));
        }
    }

    #[test]
    fn test_action_targets() {
        assert_eq!(TaskAction::Complete.target(), TaskStatus::Completed);
        assert_eq!(TaskAction::Cancel.target(), TaskStatus::Cancelled);
        assert_eq!(TaskAction::WaitForUser.target(), TaskStatus::WaitingForUser);
    }

    #[test]
    fn test_sources_sql() {
        assert_eq!(
            TaskAction::WaitForUser.sources_sql(),
            "'pending', 'in_progress'"
        );
    }

    #[test]
    fn test_parse_status_unknown_value() {
        let err = parse_status("done").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("invalid status: 'done'"));
        assert!(message.contains("waiting_for_user"));
    }

    #[test]
    fn test_parse_status_filter() {
        let parsed = parse_status_filter(&["pending".to_string(), "completed".to_string()]).unwrap();
        assert_eq!(parsed, vec![TaskStatus::Pending, TaskStatus::Completed]);

        let err = parse_status_filter(&["  ".to_string()]).unwrap_err();
        assert_eq!(err.to_string(), "status cannot be empty");

        let err =
            parse_status_filter(&["pending".to_string(), "pending".to_string()]).unwrap_err();
        assert_eq!(err.to_string(), "duplicate status: 'pending'");

        let err = parse_status_filter(&["nope".to_string()]).unwrap_err();
        assert!(err.to_string().contains("invalid status: 'nope'"));
    }

    #[test]
    fn test_transition_conflict_messages() {
        let msg = |from, action| {
            TaskError::InvalidTransition { from, action }.to_string()
        };

        assert_eq!(
            msg(TaskStatus::Completed, TaskAction::Complete),
            "task is already completed"
        );
        assert_eq!(
            msg(TaskStatus::Cancelled, TaskAction::Cancel),
            "task is already cancelled"
        );
        assert_eq!(
            msg(TaskStatus::Completed, TaskAction::Cancel),
            "cannot cancel completed task"
        );
        assert_eq!(
            msg(TaskStatus::Cancelled, TaskAction::Complete),
            "cannot complete cancelled task"
        );
        assert_eq!(
            msg(TaskStatus::Completed, TaskAction::WaitForUser),
            "cannot send completed task to waiting"
        );
        assert_eq!(
            msg(TaskStatus::WaitingForUser, TaskAction::WaitForUser),
            "task is already waiting for user"
        );
    }

    mod classify_order {
        use super::*;

        fn snapshot(status: TaskStatus, archived: bool, created_by: Uuid, assigned_to: Uuid) -> TaskSnapshot {
            TaskSnapshot {
                status: status.as_str().to_string(),
                is_archived: archived,
                created_by,
                assigned_to,
            }
        }

        fn party(id: Uuid) -> Actor {
            Actor { id, is_admin: false }
        }

        #[test]
        fn test_missing_row_is_not_found() {
            let err = classify(None, &party(Uuid::new_v4()), TaskAction::Complete);
            assert!(matches!(err, TaskError::NotFound));
        }

        #[test]
        fn test_permission_checked_before_archived() {
            // Archived AND foreign: the stranger must see a permission error,
            // not learn about archival state
            let snap = snapshot(TaskStatus::Pending, true, Uuid::new_v4(), Uuid::new_v4());
            let err = classify(Some(&snap), &party(Uuid::new_v4()), TaskAction::Cancel);
            assert!(matches!(err, TaskError::Permission(_)));
        }

        #[test]
        fn test_archived_checked_before_status() {
            // Archived AND completed: archival wins for a party
            let owner = Uuid::new_v4();
            let snap = snapshot(TaskStatus::Completed, true, owner, Uuid::new_v4());
            let err = classify(Some(&snap), &party(owner), TaskAction::Complete);
            assert!(matches!(err, TaskError::Archived));
        }

        #[test]
        fn test_completed_reported_for_party() {
            let owner = Uuid::new_v4();
            let snap = snapshot(TaskStatus::Completed, false, owner, Uuid::new_v4());
            let err = classify(Some(&snap), &party(owner), TaskAction::Complete);
            assert_eq!(err.to_string(), "task is already completed");
        }

        #[test]
        fn test_cancelled_reported_for_party() {
            let owner = Uuid::new_v4();
            let snap = snapshot(TaskStatus::Cancelled, false, owner, Uuid::new_v4());
            let err = classify(Some(&snap), &party(owner), TaskAction::Cancel);
            assert_eq!(err.to_string(), "task is already cancelled");
        }

        #[test]
        fn test_unmapped_pair_rejected() {
            let owner = Uuid::new_v4();
            let snap = snapshot(TaskStatus::WaitingForUser, false, owner, Uuid::new_v4());
            let err = classify(Some(&snap), &party(owner), TaskAction::WaitForUser);
            assert!(matches!(
                err,
                TaskError::InvalidTransition {
                    from: TaskStatus::WaitingForUser,
                    action: TaskAction::WaitForUser,
                }
            ));
        }

        #[test]
        fn test_admin_gets_no_bypass() {
            let snap = snapshot(TaskStatus::Pending, false, Uuid::new_v4(), Uuid::new_v4());
            let admin = Actor { id: Uuid::new_v4(), is_admin: true };
            let err = classify(Some(&snap), &admin, TaskAction::Complete);
            assert!(matches!(err, TaskError::Permission(_)));
        }
    }
}
