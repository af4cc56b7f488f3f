//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
        HeaderMap,
    },
};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use crate::common::{safe_email_log, ApiError, AppState};

/// Name of the session cookie set on login
pub const SESSION_COOKIE: &str = "tm_session";

/// Authenticated caller, resolved from the server-side session store.
///
/// This is the capability object injected into every protected handler;
/// workflow code never reads ambient session state.
#[derive(Debug)]
pub struct AuthedUser {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub session_token: String,
}

/// Pull the opaque session token from either the Authorization header
/// (`Bearer <token>`) or the session cookie.
pub fn session_token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok()) {
        let token = value.strip_prefix("Bearer ").unwrap_or(value);
        if !token.is_empty() {
            return Some(token.to_string());
        }
    }

    headers
        .get(COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|cookies| {
            cookies.split(';').find_map(|part| {
                part.trim()
                    .strip_prefix(&format!("{}=", SESSION_COOKIE))
                    .map(str::to_string)
            })
        })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        let token = match session_token_from_headers(&parts.headers) {
            Some(t) => t,
            None => {
                warn!("Authentication failed: no session token presented");
                return Err(ApiError::Unauthorized("User not logged in".to_string()));
            }
        };

        let now = Utc::now().timestamp();

        let row: Option<(String, String, String)> = sqlx::query_as(
            r#"
            SELECT u.id, u.email, u.name
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = ? AND s.expires_at > ?
            "#,
        )
        .bind(&token)
        .bind(now)
        .fetch_optional(&app_state.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error during session lookup");
            ApiError::DatabaseError(e)
        })?;

        match row {
            Some((user_id, email, name)) => {
                debug!(
                    user_id = %user_id,
                    email = %safe_email_log(&email),
                    "Session resolved via extractor"
                );
                Ok(AuthedUser {
                    user_id,
                    email,
                    name,
                    session_token: token,
                })
            }
            None => {
                warn!("Authentication failed: session unknown or expired");
                Err(ApiError::Unauthorized("Session expired".to_string()))
            }
        }
    }
}
