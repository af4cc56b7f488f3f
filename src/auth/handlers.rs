//! Authentication handlers

use axum::extract::{Extension, Json};
use axum::http::{header::SET_COOKIE, HeaderMap};
use axum::response::IntoResponse;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::extractors::{session_token_from_headers, AuthedUser, SESSION_COOKIE};
use super::models::{LoginRequest, RegisterRequest, User};
use super::password::{hash_password, verify_password};
use crate::common::{
    generate_secure_token, generate_user_id, is_valid_email, safe_email_log, ApiError, AppState,
};

/// POST /api/auth/register
/// Creates a new user account
///
/// # Request Body
/// ```json
/// {
///   "name": "Ada",
///   "email": "ada@example.com",
///   "password": "secret"
/// }
/// ```
pub async fn register_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let name = payload.name.trim();
    let email = payload.email.trim().to_lowercase();

    if name.is_empty() || email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::ValidationError(
            "Please fill in all fields".to_string(),
        ));
    }

    if !is_valid_email(&email) {
        return Err(ApiError::ValidationError(
            "Please enter a valid email address".to_string(),
        ));
    }

    if payload.password.len() < 6 {
        return Err(ApiError::ValidationError(
            "Password must be at least 6 characters long".to_string(),
        ));
    }

    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if existing.is_some() {
        return Err(ApiError::ValidationError(
            "This email is already registered".to_string(),
        ));
    }

    let user_id = generate_user_id();
    let password_hash = hash_password(&payload.password)?;
    let now = Utc::now().to_rfc3339();

    sqlx::query("INSERT INTO users (id, name, email, password_hash, created_at) VALUES (?, ?, ?, ?, ?)")
        .bind(&user_id)
        .bind(name)
        .bind(&email)
        .bind(&password_hash)
        .bind(&now)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(
        user_id = %user_id,
        email = %safe_email_log(&email),
        "New user account registered"
    );

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Registration successful! Please login."
    })))
}

/// POST /api/auth/login
/// Verifies credentials and opens a server-side session
///
/// # Response
/// ```json
/// {
///   "success": true,
///   "redirect": "/dashboard",
///   "userName": "Ada"
/// }
/// ```
/// plus a `Set-Cookie` header carrying the opaque session token.
pub async fn login_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let email = payload.email.trim().to_lowercase();

    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::ValidationError(
            "Please fill in all fields".to_string(),
        ));
    }

    let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let user = match user {
        Some(u) => u,
        None => {
            warn!(email = %safe_email_log(&email), "Login failed: email not found");
            return Err(ApiError::Unauthorized("Email not found".to_string()));
        }
    };

    if !verify_password(&payload.password, &user.password_hash) {
        warn!(user_id = %user.id, "Login failed: incorrect password");
        return Err(ApiError::Unauthorized("Incorrect password".to_string()));
    }

    let token = generate_secure_token(32);
    let now = Utc::now();
    let expires_at = (now + Duration::hours(state.session_ttl_hours)).timestamp();

    sqlx::query("INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)")
        .bind(&token)
        .bind(&user.id)
        .bind(now.to_rfc3339())
        .bind(expires_at)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        "User logged in"
    );

    let cookie = format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        state.session_ttl_hours * 3600
    );

    let body = serde_json::json!({
        "success": true,
        "redirect": "/dashboard",
        "userName": user.name,
    });

    Ok(([(SET_COOKIE, cookie)], Json(body)))
}

/// POST /api/auth/logout
/// Destroys the caller's server-side session
pub async fn logout_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(&authed.session_token)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.user_id, "User logged out");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Logout successful"
    })))
}

/// GET /api/auth/session
/// Reports whether the presented session token is active.
/// Never fails: an absent or expired session yields `session_active: false`.
pub async fn session_check_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let token = match session_token_from_headers(&headers) {
        Some(t) => t,
        None => {
            return Ok(Json(serde_json::json!({
                "session_active": false,
                "user_id": null,
            })))
        }
    };

    let now = Utc::now().timestamp();

    let row: Option<(String,)> =
        sqlx::query_as("SELECT user_id FROM sessions WHERE token = ? AND expires_at > ?")
            .bind(&token)
            .bind(now)
            .fetch_optional(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

    Ok(Json(serde_json::json!({
        "session_active": row.is_some(),
        "user_id": row.map(|(id,)| id),
    })))
}
