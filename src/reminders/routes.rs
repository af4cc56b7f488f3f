use super::handlers;
use axum::{routing::post, Router};

/// Creates the reminders router
pub fn reminders_routes() -> Router {
    Router::new()
        .route("/api/reminders", post(handlers::schedule_reminder))
        .route("/api/reminders/check", post(handlers::check_reminders))
        .route("/api/reminders/test", post(handlers::test_reminders))
}
