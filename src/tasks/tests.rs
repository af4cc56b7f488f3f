//! Tests for the tasks module

use super::models::CreateTaskRequest;
use super::services::TasksService;
use super::validators::{parse_deadline, TaskValidator};
use crate::common::{ApiError, Validator};
use crate::courses::models::CreateCourseRequest;
use crate::courses::CoursesService;
use crate::test_utils::{seed_user, test_state};

fn task_request(name: &str, course_id: &str, deadline: &str) -> CreateTaskRequest {
    CreateTaskRequest {
        name: name.to_string(),
        course_id: course_id.to_string(),
        tag: None,
        deadline: deadline.to_string(),
    }
}

#[test]
fn test_parse_deadline_formats() {
    assert!(parse_deadline("2025-01-01T10:00:00").is_some());
    assert!(parse_deadline("2025-01-01T10:00").is_some());
    assert!(parse_deadline("2025-01-01 10:00:00").is_some());
    assert!(parse_deadline(" 2025-01-01T10:00:00 ").is_some());

    assert!(parse_deadline("2025-01-01").is_none());
    assert!(parse_deadline("tomorrow").is_none());
    assert!(parse_deadline("").is_none());
}

#[test]
fn test_validator_requires_core_fields() {
    let result = TaskValidator.validate(&task_request("", "C_ABC123", "2025-01-01T10:00:00"));
    assert!(!result.is_valid);
    assert!(result.errors.iter().any(|e| e.field == "name"));

    let result = TaskValidator.validate(&task_request("HW1", "", "2025-01-01T10:00:00"));
    assert!(!result.is_valid);
    assert!(result.errors.iter().any(|e| e.field == "course_id"));

    let result = TaskValidator.validate(&task_request("HW1", "C_ABC123", "not-a-date"));
    assert!(!result.is_valid);
    assert!(result.errors.iter().any(|e| e.field == "deadline"));
}

#[tokio::test]
async fn test_create_requires_existing_course() {
    let (state, _) = test_state().await;
    let (user_id, _) = seed_user(&state, "Ada", "ada@example.com", "secret1").await;
    let db = state.read().await.db.clone();
    let service = TasksService::new(db.clone());

    let result = service
        .create_task(&user_id, task_request("HW1", "C_MISSIN", "2025-01-01T10:00:00"))
        .await;
    assert!(matches!(result, Err(ApiError::NotFound(_))));

    // No task row may survive the failed create
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
        .fetch_one(&db)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_course_reference_is_owner_scoped() {
    let (state, _) = test_state().await;
    let (ada, _) = seed_user(&state, "Ada", "ada@example.com", "secret1").await;
    let (bob, _) = seed_user(&state, "Bob", "bob@example.com", "secret2").await;
    let db = state.read().await.db.clone();

    let course = CoursesService::new(db.clone())
        .create_course(
            &ada,
            CreateCourseRequest {
                course_code: "IT206".to_string(),
                course_name: "DB Systems".to_string(),
                professor_name: "Dr. X".to_string(),
            },
        )
        .await
        .unwrap();

    // Bob cannot attach a task to Ada's course
    let result = TasksService::new(db)
        .create_task(&bob, task_request("HW1", &course.id, "2025-01-01T10:00:00"))
        .await;
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_create_then_list_roundtrip() {
    let (state, _) = test_state().await;
    let (user_id, _) = seed_user(&state, "Ada", "ada@example.com", "secret1").await;
    let db = state.read().await.db.clone();

    let course = CoursesService::new(db.clone())
        .create_course(
            &user_id,
            CreateCourseRequest {
                course_code: "IT206".to_string(),
                course_name: "DB Systems".to_string(),
                professor_name: "Dr. X".to_string(),
            },
        )
        .await
        .unwrap();

    let service = TasksService::new(db);
    let task = service
        .create_task(&user_id, task_request("HW1", &course.id, "2025-01-01T10:00"))
        .await
        .unwrap();

    // Deadline is normalized to the canonical format
    assert_eq!(task.deadline, "2025-01-01T10:00:00");
    assert_eq!(task.completed, 0);

    let tasks = service.list_tasks(&user_id).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, task.id);
    assert_eq!(tasks[0].name, "HW1");
}

#[tokio::test]
async fn test_delete_rolls_back_when_task_missing() {
    let (state, _) = test_state().await;
    let (ada, _) = seed_user(&state, "Ada", "ada@example.com", "secret1").await;
    let (bob, _) = seed_user(&state, "Bob", "bob@example.com", "secret2").await;
    let db = state.read().await.db.clone();

    let course = CoursesService::new(db.clone())
        .create_course(
            &ada,
            CreateCourseRequest {
                course_code: "IT206".to_string(),
                course_name: "DB Systems".to_string(),
                professor_name: "Dr. X".to_string(),
            },
        )
        .await
        .unwrap();

    let service = TasksService::new(db.clone());
    let task = service
        .create_task(&ada, task_request("HW1", &course.id, "2025-01-01T10:00:00"))
        .await
        .unwrap();

    crate::reminders::RemindersService::new(db.clone())
        .schedule_reminder(
            &ada,
            crate::reminders::models::ScheduleReminderRequest {
                task_id: task.id.clone(),
                email: "ada@example.com".to_string(),
                reminder_time: 60,
            },
        )
        .await
        .unwrap();

    // Bob's delete matches no task row, so the reminder delete must be
    // rolled back too
    let result = service.delete_task(&bob, &task.id).await;
    assert!(matches!(result, Err(ApiError::NotFound(_))));

    let (reminder_count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM reminders WHERE task_id = ?")
            .bind(&task.id)
            .fetch_one(&db)
            .await
            .unwrap();
    assert_eq!(reminder_count, 1);

    // The owner's delete removes both
    service.delete_task(&ada, &task.id).await.unwrap();

    let (reminder_count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM reminders WHERE task_id = ?")
            .bind(&task.id)
            .fetch_one(&db)
            .await
            .unwrap();
    assert_eq!(reminder_count, 0);
}
