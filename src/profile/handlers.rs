//! Profile handlers: display name, password change, email change

use axum::extract::{Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::models::{UpdateEmailRequest, UpdateProfileRequest};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::AuthedUser;
use crate::common::{is_valid_email, safe_email_log, ApiError, AppState};
use crate::verification::VerificationService;

/// GET /api/profile/name - The caller's display name
pub async fn get_user_name(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let app_state = state.read().await;

    let row: Option<(String,)> = sqlx::query_as("SELECT name FROM users WHERE id = ?")
        .bind(&user.user_id)
        .fetch_optional(&app_state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let name = row.map(|(n,)| n).unwrap_or_else(|| "Guest".to_string());

    Ok(Json(serde_json::json!({
        "success": true,
        "name": name
    })))
}

/// POST /api/profile/update - Change display name and/or password.
/// A password change requires the current password.
pub async fn update_profile(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let app_state = state.read().await;

    let name = request.name.as_deref().map(str::trim).filter(|n| !n.is_empty());

    if let Some(new_password) = request.new_password.as_deref().filter(|p| !p.is_empty()) {
        let current = request
            .current_password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                ApiError::ValidationError("Current password is required".to_string())
            })?;

        if new_password.len() < 6 {
            return Err(ApiError::ValidationError(
                "Password must be at least 6 characters long".to_string(),
            ));
        }

        let (stored_hash,): (String,) =
            sqlx::query_as("SELECT password_hash FROM users WHERE id = ?")
                .bind(&user.user_id)
                .fetch_one(&app_state.db)
                .await
                .map_err(ApiError::DatabaseError)?;

        if !verify_password(current, &stored_hash) {
            return Err(ApiError::Unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }

        let new_hash = hash_password(new_password)?;
        sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(&new_hash)
            .bind(&user.user_id)
            .execute(&app_state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        info!(user_id = %user.user_id, "Password changed");
    }

    if let Some(name) = name {
        sqlx::query("UPDATE users SET name = ? WHERE id = ?")
            .bind(name)
            .bind(&user.user_id)
            .execute(&app_state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        info!(user_id = %user.user_id, "Display name updated");
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "name": name,
    })))
}

/// POST /api/profile/email - Apply a verified email change.
///
/// The new address must have passed the verification-code flow in this
/// session; the consumed challenge cannot be reused for another change.
pub async fn update_email(
    Extension(state): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Json(request): Json<UpdateEmailRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let app_state = state.read().await;

    let new_email = request.new_email.trim().to_lowercase();

    if !is_valid_email(&new_email) {
        return Err(ApiError::ValidationError("Invalid email format".to_string()));
    }

    let verification = VerificationService::new(app_state.db.clone());
    if !verification
        .has_verified_email(&user.session_token, &new_email)
        .await?
    {
        return Err(ApiError::StateError(
            "Email address has not been verified".to_string(),
        ));
    }

    let taken: Option<(String,)> =
        sqlx::query_as("SELECT id FROM users WHERE email = ? AND id != ?")
            .bind(&new_email)
            .bind(&user.user_id)
            .fetch_optional(&app_state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

    if taken.is_some() {
        return Err(ApiError::ValidationError(
            "Email already in use".to_string(),
        ));
    }

    sqlx::query("UPDATE users SET email = ? WHERE id = ?")
        .bind(&new_email)
        .bind(&user.user_id)
        .execute(&app_state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    verification.consume_challenge(&user.session_token).await?;

    info!(
        user_id = %user.user_id,
        new_email = %safe_email_log(&new_email),
        "Email address updated"
    );

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Email updated successfully",
        "new_email": new_email
    })))
}
