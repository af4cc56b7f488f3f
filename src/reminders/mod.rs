//! # Reminders Module
//!
//! One-shot deadline reminders: scheduling, the due/grace-window query,
//! the at-most-once dispatch cycle, and the periodic background task.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;


pub use models::{Reminder, GRACE_WINDOW_SECS, SUPPORTED_LEAD_MINUTES};
pub use routes::reminders_routes;
pub use services::{start_reminder_task, RemindersService};
