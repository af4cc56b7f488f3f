use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: String,
    pub course_code: String,
    pub course_name: String,
    pub professor_name: String,
    #[serde(skip_serializing)]
    pub user_id: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub course_code: String,
    pub course_name: String,
    pub professor_name: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteCourseRequest {
    pub course_id: String,
}
