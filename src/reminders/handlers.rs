//! Reminder scheduling and dispatch handlers

use axum::extract::{Extension, Json};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::ScheduleReminderRequest;
use super::services::RemindersService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};

/// POST /api/reminders - Schedule a reminder for one of the caller's tasks
pub async fn schedule_reminder(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Json(request): Json<ScheduleReminderRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let app_state = state.read().await;
    let reminders_service = RemindersService::new(app_state.db.clone());

    reminders_service
        .schedule_reminder(&user.user_id, request)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Reminder scheduled successfully"
    })))
}

/// POST /api/reminders/check - Cron-style trigger for the dispatch cycle.
///
/// Unauthenticated by design: the caller is an external scheduler, not a
/// user, and the cycle touches nothing the caller chooses. Overlapping
/// invocations are safe.
pub async fn check_reminders(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let app_state = state.read().await.clone();
    let reminders_service = RemindersService::new(app_state.db.clone());

    let summary = reminders_service
        .run_due_cycle(&app_state.mail, Utc::now())
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "sent": summary.sent,
        "failed": summary.failed,
    })))
}

/// POST /api/reminders/test - Send every unsent reminder immediately,
/// ignoring fire times. Intended for verifying mail configuration.
pub async fn test_reminders(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let app_state = state.read().await.clone();
    let reminders_service = RemindersService::new(app_state.db.clone());

    let summary = reminders_service.send_all_unsent(&app_state.mail).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("Test complete: {} sent, {} failed", summary.sent, summary.failed),
    })))
}
