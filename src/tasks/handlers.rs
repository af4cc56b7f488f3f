//! Task registry handlers

use axum::extract::{Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::{CreateTaskRequest, DeleteTaskRequest};
use super::services::TasksService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};

/// POST /api/tasks - Create a task
///
/// # Response
/// ```json
/// {
///   "success": true,
///   "task_id": "T_K7NP3X",
///   "message": "Task added successfully"
/// }
/// ```
pub async fn create_task(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Json(request): Json<CreateTaskRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let app_state = state.read().await;
    let tasks_service = TasksService::new(app_state.db.clone());

    let task = tasks_service.create_task(&user.user_id, request).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "task_id": task.id,
        "message": "Task added successfully"
    })))
}

/// GET /api/tasks - List the caller's tasks, newest first
pub async fn list_tasks(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let app_state = state.read().await;
    let tasks_service = TasksService::new(app_state.db.clone());

    let tasks = tasks_service.list_tasks(&user.user_id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "tasks": tasks
    })))
}

/// POST /api/tasks/delete - Delete one of the caller's tasks
/// Dependent reminders are removed in the same transaction.
pub async fn delete_task(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Json(request): Json<DeleteTaskRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let app_state = state.read().await;
    let tasks_service = TasksService::new(app_state.db.clone());

    tasks_service
        .delete_task(&user.user_id, &request.task_id)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Task deleted successfully"
    })))
}
