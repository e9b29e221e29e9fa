/// Task comment model and database operations
///
/// Comments form an append-only ledger attached to a task. They are
/// immutable once created and never outlive their task (the task is the
/// aggregate root; deletion cascades). The only operation that writes a
/// comment is the `wait_for_user` transition, which inserts the row inside
/// the same transaction as the status change.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE task_comments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     created_by UUID NOT NULL REFERENCES users(id),
///     comment TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// A single comment row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskComment {
    /// Unique comment id
    pub id: Uuid,

    /// Owning task
    pub task_id: Uuid,

    /// Author
    pub created_by: Uuid,

    /// Comment text
    pub comment: String,

    /// When the comment was written
    pub created_at: DateTime<Utc>,
}

/// Comment joined with its author's display name, for listings
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskCommentWithAuthor {
    pub id: Uuid,
    pub task_id: Uuid,
    pub created_by: Uuid,

    /// Author display name
    pub created_by_name: String,

    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl TaskComment {
    /// Appends a comment to a task
    ///
    /// Takes a bare connection so callers can run the insert inside an
    /// open transaction (the `wait_for_user` transition does exactly
    /// that).
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the insert.
    pub async fn append(
        conn: &mut PgConnection,
        task_id: Uuid,
        created_by: Uuid,
        comment: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, TaskComment>(
            r#"
            INSERT INTO task_comments (task_id, created_by, comment)
            VALUES ($1, $2, $3)
            RETURNING id, task_id, created_by, comment, created_at
            "#,
        )
        .bind(task_id)
        .bind(created_by)
        .bind(comment)
        .fetch_one(conn)
        .await
    }

    /// Lists a task's comments in the order they were written
    pub async fn list_for_task(
        pool: &PgPool,
        task_id: Uuid,
    ) -> Result<Vec<TaskCommentWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, TaskCommentWithAuthor>(
            r#"
            SELECT tc.id, tc.task_id, tc.created_by, u.name AS created_by_name,
                   tc.comment, tc.created_at
            FROM task_comments tc
            JOIN users u ON tc.created_by = u.id
            WHERE tc.task_id = $1
            ORDER BY tc.created_at ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_serialization() {
        let comment = TaskCommentWithAuthor {
            id: Uuid::new_v4(),
            task_id: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
            created_by_name: "alice".to_string(),
            comment: "need credentials for the staging box".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&comment).unwrap();
        assert_eq!(json["created_by_name"], "alice");
        assert_eq!(json["comment"], "need credentials for the staging box");
    }
}
