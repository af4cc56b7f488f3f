//! Email verification handlers

use axum::extract::{Extension, Json};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::VerificationRequest;
use super::services::VerificationService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};

/// POST /api/verification - Issue or verify an email verification code
///
/// # Request Body
/// ```json
/// { "action": "send_code", "email": "ada@example.com" }
/// ```
/// or
/// ```json
/// { "action": "verify_code", "email": "ada@example.com", "code": "004217" }
/// ```
pub async fn verification_handler(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Json(request): Json<VerificationRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let app_state = state.read().await.clone();
    let service = VerificationService::new(app_state.db.clone());

    match request {
        VerificationRequest::SendCode { email } => {
            service
                .issue_code(&app_state.mail, &user.session_token, &email, Utc::now())
                .await?;

            Ok(Json(serde_json::json!({
                "success": true,
                "message": "Verification code sent to your email"
            })))
        }
        VerificationRequest::VerifyCode { email, code } => {
            service
                .verify_code(&user.session_token, &email, &code, Utc::now())
                .await?;

            Ok(Json(serde_json::json!({
                "success": true,
                "message": "Email verified successfully"
            })))
        }
    }
}
