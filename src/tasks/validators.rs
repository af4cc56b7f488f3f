// src/tasks/validators.rs

use super::models::CreateTaskRequest;
use crate::common::{ValidationResult, Validator};
use chrono::NaiveDateTime;

/// Accepted client formats for deadlines. Everything is normalized to
/// `%Y-%m-%dT%H:%M:%S` before storage.
const DEADLINE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

pub fn parse_deadline(raw: &str) -> Option<NaiveDateTime> {
    DEADLINE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw.trim(), format).ok())
}

pub struct TaskValidator;

impl Validator<CreateTaskRequest> for TaskValidator {
    fn validate(&self, data: &CreateTaskRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.name.trim().is_empty() {
            result.add_error("name", "Task name is required");
        } else if data.name.len() > 255 {
            result.add_error("name", "Task name must be less than 255 characters");
        }

        if data.course_id.trim().is_empty() {
            result.add_error("course_id", "Course is required");
        }

        if let Some(tag) = &data.tag {
            if tag.len() > 64 {
                result.add_error("tag", "Tag must be less than 64 characters");
            }
        }

        if data.deadline.trim().is_empty() {
            result.add_error("deadline", "Deadline is required");
        } else if parse_deadline(&data.deadline).is_none() {
            result.add_error("deadline", "Deadline must be a valid date-time");
        }

        result
    }
}
