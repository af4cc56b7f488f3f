use super::models::{CreateTaskRequest, Task};
use super::validators::{parse_deadline, TaskValidator};
use crate::common::{generate_task_id, ApiError, Validator};
use sqlx::SqlitePool;
use tracing::info;

pub struct TasksService {
    db: SqlitePool,
}

impl TasksService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create a task owned by `user_id`.
    ///
    /// The referenced course must exist for the same owner at creation
    /// time. The check-then-insert is not serialized against a concurrent
    /// course delete; course deletion refuses while tasks exist, so the
    /// worst interleaving leaves a task whose course vanished, same as
    /// the delete ordering would.
    pub async fn create_task(
        &self,
        user_id: &str,
        request: CreateTaskRequest,
    ) -> Result<Task, ApiError> {
        let validation_result = TaskValidator.validate(&request);
        if !validation_result.is_valid {
            return Err(ApiError::from(validation_result));
        }

        let course: Option<(String,)> =
            sqlx::query_as("SELECT id FROM courses WHERE id = ? AND user_id = ?")
                .bind(request.course_id.trim())
                .bind(user_id)
                .fetch_optional(&self.db)
                .await
                .map_err(ApiError::DatabaseError)?;

        if course.is_none() {
            return Err(ApiError::NotFound("Course not found".to_string()));
        }

        // parse_deadline succeeded during validation
        let deadline = parse_deadline(&request.deadline)
            .ok_or_else(|| ApiError::ValidationError("Deadline must be a valid date-time".to_string()))?
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string();

        let task_id = generate_task_id();
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO tasks (id, name, course_id, tag, deadline, completed, user_id, created_at)
            VALUES (?, ?, ?, ?, ?, 0, ?, ?)
            "#,
        )
        .bind(&task_id)
        .bind(request.name.trim())
        .bind(request.course_id.trim())
        .bind(request.tag.as_deref())
        .bind(&deadline)
        .bind(user_id)
        .bind(&now)
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        info!(task_id = %task_id, user_id = %user_id, "Created task");

        self.get_task_by_id(user_id, &task_id).await
    }

    /// Get one task by id, scoped to its owner
    pub async fn get_task_by_id(&self, user_id: &str, task_id: &str) -> Result<Task, ApiError> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, name, course_id, tag, deadline, completed, user_id, created_at
            FROM tasks
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))
    }

    /// All tasks for the owner, newest first
    pub async fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>, ApiError> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, name, course_id, tag, deadline, completed, user_id, created_at
            FROM tasks
            WHERE user_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        Ok(tasks)
    }

    /// Delete a task and its reminders in one transaction.
    ///
    /// Reminders go first; if the task row then fails to match id+owner
    /// the whole transaction rolls back, so reminders are never orphaned
    /// by a failed delete.
    pub async fn delete_task(&self, user_id: &str, task_id: &str) -> Result<(), ApiError> {
        let mut tx = self.db.begin().await.map_err(ApiError::DatabaseError)?;

        sqlx::query("DELETE FROM reminders WHERE task_id = ? AND user_id = ?")
            .bind(task_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(ApiError::DatabaseError)?;

        let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
            .bind(task_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(ApiError::DatabaseError)?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls back the reminder delete
            return Err(ApiError::NotFound(
                "Task not found or unauthorized".to_string(),
            ));
        }

        tx.commit().await.map_err(ApiError::DatabaseError)?;

        info!(task_id = %task_id, user_id = %user_id, "Deleted task and its reminders");

        Ok(())
    }
}
