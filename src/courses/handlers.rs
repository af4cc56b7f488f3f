//! Course registry handlers

use axum::extract::{Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::{CreateCourseRequest, DeleteCourseRequest};
use super::services::CoursesService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};

/// POST /api/courses - Create a course
///
/// # Response
/// ```json
/// {
///   "success": true,
///   "course_id": "C_K7NP3X",
///   "message": "Course added successfully"
/// }
/// ```
pub async fn create_course(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Json(request): Json<CreateCourseRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let app_state = state.read().await;
    let courses_service = CoursesService::new(app_state.db.clone());

    let course = courses_service.create_course(&user.user_id, request).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "course_id": course.id,
        "message": "Course added successfully"
    })))
}

/// GET /api/courses - List the caller's courses, newest first
pub async fn list_courses(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let app_state = state.read().await;
    let courses_service = CoursesService::new(app_state.db.clone());

    let courses = courses_service.list_courses(&user.user_id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "courses": courses
    })))
}

/// POST /api/courses/delete - Delete one of the caller's courses
pub async fn delete_course(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Json(request): Json<DeleteCourseRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let app_state = state.read().await;
    let courses_service = CoursesService::new(app_state.db.clone());

    let affected_rows = courses_service
        .delete_course(&user.user_id, &request.course_id)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "affected_rows": affected_rows,
        "message": "Course deleted successfully"
    })))
}
