use super::models::{Course, CreateCourseRequest};
use super::validators::CourseValidator;
use crate::common::{generate_course_id, ApiError, Validator};
use sqlx::SqlitePool;
use tracing::info;

pub struct CoursesService {
    db: SqlitePool,
}

impl CoursesService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create a course owned by `user_id`
    pub async fn create_course(
        &self,
        user_id: &str,
        request: CreateCourseRequest,
    ) -> Result<Course, ApiError> {
        let validation_result = CourseValidator.validate(&request);
        if !validation_result.is_valid {
            return Err(ApiError::from(validation_result));
        }

        let course_id = generate_course_id();
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO courses (id, course_code, course_name, professor_name, user_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&course_id)
        .bind(request.course_code.trim())
        .bind(request.course_name.trim())
        .bind(request.professor_name.trim())
        .bind(user_id)
        .bind(&now)
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        info!(course_id = %course_id, user_id = %user_id, "Created course");

        self.get_course_by_id(user_id, &course_id).await
    }

    /// Get one course by id, scoped to its owner
    pub async fn get_course_by_id(&self, user_id: &str, course_id: &str) -> Result<Course, ApiError> {
        sqlx::query_as::<_, Course>(
            r#"
            SELECT id, course_code, course_name, professor_name, user_id, created_at
            FROM courses
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(course_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))
    }

    /// All courses for the owner, newest first
    pub async fn list_courses(&self, user_id: &str) -> Result<Vec<Course>, ApiError> {
        let courses = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, course_code, course_name, professor_name, user_id, created_at
            FROM courses
            WHERE user_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        Ok(courses)
    }

    /// Delete a course by id, scoped to its owner.
    ///
    /// A course that still has tasks cannot be deleted; the caller must
    /// delete the tasks first. Returns the number of affected rows.
    pub async fn delete_course(&self, user_id: &str, course_id: &str) -> Result<u64, ApiError> {
        let (task_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE course_id = ? AND user_id = ?")
                .bind(course_id)
                .bind(user_id)
                .fetch_one(&self.db)
                .await
                .map_err(ApiError::DatabaseError)?;

        if task_count > 0 {
            return Err(ApiError::StateError(format!(
                "Course has {} task(s); delete them first",
                task_count
            )));
        }

        let result = sqlx::query("DELETE FROM courses WHERE id = ? AND user_id = ?")
            .bind(course_id)
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(
                "Course not found or already deleted".to_string(),
            ));
        }

        info!(course_id = %course_id, user_id = %user_id, "Deleted course");

        Ok(result.rows_affected())
    }
}
