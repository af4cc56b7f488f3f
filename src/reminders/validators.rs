// src/reminders/validators.rs

use super::models::{ScheduleReminderRequest, SUPPORTED_LEAD_MINUTES};
use crate::common::{is_valid_email, ValidationResult, Validator};

pub struct ReminderValidator;

impl Validator<ScheduleReminderRequest> for ReminderValidator {
    fn validate(&self, data: &ScheduleReminderRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.task_id.trim().is_empty() {
            result.add_error("task_id", "Task is required");
        }

        if data.email.trim().is_empty() {
            result.add_error("email", "Email is required");
        } else if !is_valid_email(data.email.trim()) {
            result.add_error("email", "Invalid email format");
        }

        if !SUPPORTED_LEAD_MINUTES.contains(&data.reminder_time) {
            result.add_error(
                "reminder_time",
                "Reminder time must be 30, 60, or 1440 minutes",
            );
        }

        result
    }
}
