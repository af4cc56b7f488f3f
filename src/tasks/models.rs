use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub course_id: String,
    pub tag: Option<String>,
    /// Canonical "%Y-%m-%dT%H:%M:%S" timestamp, UTC
    pub deadline: String,
    pub completed: i64,
    #[serde(skip_serializing)]
    pub user_id: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub name: String,
    pub course_id: String,
    pub tag: Option<String>,
    pub deadline: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteTaskRequest {
    pub task_id: String,
}
