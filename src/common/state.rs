// Application state shared across all modules

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::services::MailService;

/// Application state containing database pool, services, and configuration
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub mail: Arc<MailService>,
    /// Base URL used when building links embedded in outbound email
    /// (e.g. the password reset link).
    pub app_base_url: String,
    /// Lifetime of a login session, in hours.
    pub session_ttl_hours: i64,
}
