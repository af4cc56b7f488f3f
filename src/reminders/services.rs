use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::models::{
    DispatchSummary, Reminder, ScheduleReminderRequest, GRACE_WINDOW_SECS, SUPPORTED_LEAD_MINUTES,
};
use super::validators::ReminderValidator;
use crate::common::{generate_reminder_id, safe_email_log, ApiError, AppState, Validator};
use crate::services::{email_templates, MailService};
use crate::tasks::validators::parse_deadline;
use crate::tasks::TasksService;

pub struct RemindersService {
    db: SqlitePool,
}

impl RemindersService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// The single derivation point for fire timestamps:
    /// fire = deadline - lead minutes.
    pub fn fire_timestamp(deadline: &NaiveDateTime, lead_minutes: i64) -> i64 {
        deadline.and_utc().timestamp() - lead_minutes * 60
    }

    /// Schedule a one-shot reminder for one of the caller's tasks.
    ///
    /// The task's stored deadline is authoritative; the client never
    /// supplies the fire time directly.
    pub async fn schedule_reminder(
        &self,
        user_id: &str,
        request: ScheduleReminderRequest,
    ) -> Result<Reminder, ApiError> {
        let validation_result = ReminderValidator.validate(&request);
        if !validation_result.is_valid {
            return Err(ApiError::from(validation_result));
        }

        let task = TasksService::new(self.db.clone())
            .get_task_by_id(user_id, request.task_id.trim())
            .await?;

        let deadline = parse_deadline(&task.deadline).ok_or_else(|| {
            ApiError::InternalServer(format!("task {} has an unparseable deadline", task.id))
        })?;

        let fire_at = Self::fire_timestamp(&deadline, request.reminder_time);

        let reminder_id = generate_reminder_id();
        let email = request.email.trim().to_lowercase();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO reminders
                (id, task_id, user_id, email, task_name, deadline, lead_minutes, fire_at, sent, expired, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, 0, ?)
            "#,
        )
        .bind(&reminder_id)
        .bind(&task.id)
        .bind(user_id)
        .bind(&email)
        .bind(&task.name)
        .bind(&task.deadline)
        .bind(request.reminder_time)
        .bind(fire_at)
        .bind(&now)
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        info!(
            reminder_id = %reminder_id,
            task_id = %task.id,
            email = %safe_email_log(&email),
            lead_minutes = request.reminder_time,
            fire_at = fire_at,
            "Scheduled reminder"
        );

        self.get_reminder_by_id(&reminder_id).await
    }

    pub async fn get_reminder_by_id(&self, reminder_id: &str) -> Result<Reminder, ApiError> {
        sqlx::query_as::<_, Reminder>("SELECT * FROM reminders WHERE id = ?")
            .bind(reminder_id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound("Reminder not found".to_string()))
    }

    /// Reminders that should fire now: unsent, inside the trailing grace
    /// window, and carrying a supported lead time.
    pub async fn due_reminders(&self, now: DateTime<Utc>) -> Result<Vec<Reminder>, ApiError> {
        let now_ts = now.timestamp();

        let reminders = sqlx::query_as::<_, Reminder>(
            r#"
            SELECT * FROM reminders
            WHERE sent = 0
              AND expired = 0
              AND lead_minutes IN (?, ?, ?)
              AND fire_at <= ?
              AND fire_at >= ?
            ORDER BY fire_at ASC
            "#,
        )
        .bind(SUPPORTED_LEAD_MINUTES[0])
        .bind(SUPPORTED_LEAD_MINUTES[1])
        .bind(SUPPORTED_LEAD_MINUTES[2])
        .bind(now_ts)
        .bind(now_ts - GRACE_WINDOW_SECS)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        Ok(reminders)
    }

    /// Mark a reminder sent. Conditional and idempotent: returns true if
    /// this call performed the 0 -> 1 transition, false if the reminder
    /// was already sent.
    pub async fn mark_sent(&self, reminder_id: &str) -> Result<bool, ApiError> {
        let result = sqlx::query("UPDATE reminders SET sent = 1 WHERE id = ? AND sent = 0")
            .bind(reminder_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        let exists: Option<(i64,)> = sqlx::query_as("SELECT sent FROM reminders WHERE id = ?")
            .bind(reminder_id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        match exists {
            Some(_) => Ok(false),
            None => Err(ApiError::NotFound("Reminder not found".to_string())),
        }
    }

    /// Transition reminders that slipped past the grace window into the
    /// terminal expired state. Dropping them late is deliberate; the only
    /// trace is the warn line per reminder.
    pub async fn expire_stale(&self, now: DateTime<Utc>) -> Result<usize, ApiError> {
        let cutoff = now.timestamp() - GRACE_WINDOW_SECS;

        let stale = sqlx::query_as::<_, Reminder>(
            "SELECT * FROM reminders WHERE sent = 0 AND expired = 0 AND fire_at < ?",
        )
        .bind(cutoff)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        let mut expired = 0;
        for reminder in stale {
            let result = sqlx::query(
                "UPDATE reminders SET expired = 1 WHERE id = ? AND sent = 0 AND expired = 0",
            )
            .bind(&reminder.id)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

            if result.rows_affected() > 0 {
                expired += 1;
                warn!(
                    reminder_id = %reminder.id,
                    task_id = %reminder.task_id,
                    fire_at = reminder.fire_at,
                    "Reminder missed its grace window; dropping without sending"
                );
            }
        }

        Ok(expired)
    }

    /// One dispatch cycle: expire the stale, then claim and send what is
    /// due. Safe to run concurrently with itself - only the invocation
    /// that wins the conditional mark dispatches a given reminder, so a
    /// reminder email can never be sent twice. A delivery failure after
    /// the claim leaves the reminder marked sent: the trade-off favors
    /// no-duplicates over guaranteed delivery.
    pub async fn run_due_cycle(
        &self,
        mail: &MailService,
        now: DateTime<Utc>,
    ) -> Result<DispatchSummary, ApiError> {
        self.expire_stale(now).await?;

        let due = self.due_reminders(now).await?;
        let mut summary = DispatchSummary::default();

        for reminder in due {
            if !self.mark_sent(&reminder.id).await? {
                continue; // another invocation claimed it
            }

            if self.dispatch_reminder(mail, &reminder).await {
                summary.sent += 1;
            } else {
                summary.failed += 1;
            }
        }

        info!(
            sent = summary.sent,
            failed = summary.failed,
            "Reminder cycle completed"
        );

        Ok(summary)
    }

    /// Test trigger: claim and send every unsent reminder immediately,
    /// ignoring fire times.
    pub async fn send_all_unsent(&self, mail: &MailService) -> Result<DispatchSummary, ApiError> {
        let unsent =
            sqlx::query_as::<_, Reminder>("SELECT * FROM reminders WHERE sent = 0 AND expired = 0")
                .fetch_all(&self.db)
                .await
                .map_err(ApiError::DatabaseError)?;

        let mut summary = DispatchSummary::default();

        for reminder in unsent {
            if !self.mark_sent(&reminder.id).await? {
                continue;
            }

            if self.dispatch_reminder(mail, &reminder).await {
                summary.sent += 1;
            } else {
                summary.failed += 1;
            }
        }

        Ok(summary)
    }

    async fn dispatch_reminder(&self, mail: &MailService, reminder: &Reminder) -> bool {
        let deadline_display = match parse_deadline(&reminder.deadline) {
            Some(deadline) => email_templates::format_deadline(&deadline),
            None => reminder.deadline.clone(),
        };

        let subject = format!("⏰ Task Deadline Reminder: {}", reminder.task_name);
        let body = email_templates::reminder_email(&reminder.task_name, &deadline_display);

        match mail.send(&reminder.email, &subject, &body).await {
            Ok(true) => {
                info!(
                    reminder_id = %reminder.id,
                    email = %safe_email_log(&reminder.email),
                    "Reminder sent"
                );
                true
            }
            Ok(false) => {
                error!(
                    reminder_id = %reminder.id,
                    email = %safe_email_log(&reminder.email),
                    "Reminder delivery failed"
                );
                false
            }
            Err(e) => {
                error!(
                    reminder_id = %reminder.id,
                    error = %e,
                    "Reminder rejected by dispatcher"
                );
                false
            }
        }
    }
}

/// Spawn the periodic dispatch loop. An external cron hitting
/// POST /api/reminders/check composes safely with this; the conditional
/// claim in run_due_cycle dedupes.
pub fn start_reminder_task(state: Arc<RwLock<AppState>>, interval_secs: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(interval_secs));
        loop {
            interval.tick().await;
            let app_state = state.read().await.clone();
            let service = RemindersService::new(app_state.db.clone());
            if let Err(e) = service.run_due_cycle(&app_state.mail, Utc::now()).await {
                error!(error = %e, "Reminder cycle failed");
            }
        }
    });
}
