use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lead times (minutes before the deadline) a reminder may use
pub const SUPPORTED_LEAD_MINUTES: [i64; 3] = [30, 60, 1440];

/// Trailing window within which a late-discovered due reminder is still
/// sent. Anything older is expired instead of sent late.
pub const GRACE_WINDOW_SECS: i64 = 5 * 60;

/// One scheduled notification.
///
/// `fire_at` is derived from deadline and lead time in exactly one place
/// (`RemindersService::fire_timestamp`) at insert. `sent` transitions
/// 0 -> 1 at most once; `expired` marks the terminal missed state.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reminder {
    pub id: String,
    pub task_id: String,
    #[serde(skip_serializing)]
    pub user_id: String,
    pub email: String,
    pub task_name: String,
    pub deadline: String,
    pub lead_minutes: i64,
    pub fire_at: i64,
    pub sent: i64,
    pub expired: i64,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleReminderRequest {
    pub task_id: String,
    pub email: String,
    /// Lead time in minutes; must be one of SUPPORTED_LEAD_MINUTES
    pub reminder_time: i64,
}

/// Outcome of one dispatch cycle
#[derive(Debug, Default, Serialize)]
pub struct DispatchSummary {
    pub sent: usize,
    pub failed: usize,
}
