//! Password reset handlers

use axum::extract::{Extension, Json};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::{ConsumeResetRequest, RequestResetRequest};
use super::services::PasswordResetService;
use crate::common::{ApiError, AppState};

/// POST /api/password-reset/request - Email a reset link.
/// The response is identical whether or not the email exists.
pub async fn request_reset(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    Json(request): Json<RequestResetRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let app_state = state.read().await.clone();
    let service = PasswordResetService::new(app_state.db.clone());

    service
        .request_reset(
            &app_state.mail,
            &app_state.app_base_url,
            &request.email,
            Utc::now(),
        )
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "If the email exists in our system, you will receive reset instructions shortly."
    })))
}

/// POST /api/password-reset/consume - Set a new password with a token
pub async fn consume_reset(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    Json(request): Json<ConsumeResetRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let app_state = state.read().await;
    let service = PasswordResetService::new(app_state.db.clone());

    service
        .consume_reset(
            &request.token,
            &request.new_password,
            &request.confirm_password,
            Utc::now(),
        )
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Password successfully reset! You can now login with your new password."
    })))
}
