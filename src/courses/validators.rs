// src/courses/validators.rs

use super::models::CreateCourseRequest;
use crate::common::{ValidationResult, Validator};

pub struct CourseValidator;

impl Validator<CreateCourseRequest> for CourseValidator {
    fn validate(&self, data: &CreateCourseRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.course_code.trim().is_empty() {
            result.add_error("course_code", "Course code is required");
        } else if data.course_code.len() > 32 {
            result.add_error("course_code", "Course code must be less than 32 characters");
        }

        if data.course_name.trim().is_empty() {
            result.add_error("course_name", "Course name is required");
        } else if data.course_name.len() > 255 {
            result.add_error("course_name", "Course name must be less than 255 characters");
        }

        if data.professor_name.trim().is_empty() {
            result.add_error("professor_name", "Professor name is required");
        } else if data.professor_name.len() > 255 {
            result.add_error(
                "professor_name",
                "Professor name must be less than 255 characters",
            );
        }

        result
    }
}
