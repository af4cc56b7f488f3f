//! Tests for the auth module
//!
//! Covers registration validation, the login/session lifecycle, and the
//! session status probe, against an in-memory database.

use axum::extract::{Extension, Json};
use axum::http::{HeaderMap, HeaderValue};

use super::handlers;
use super::models::{LoginRequest, RegisterRequest};
use crate::common::ApiError;
use crate::test_utils::{login_token, register_user, seed_user, test_state};

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let (state, _) = test_state().await;

    let missing = handlers::register_handler(
        Extension(state.clone()),
        Json(RegisterRequest {
            name: "".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret1".to_string(),
        }),
    )
    .await;
    assert!(matches!(missing, Err(ApiError::ValidationError(_))));

    let bad_email = handlers::register_handler(
        Extension(state.clone()),
        Json(RegisterRequest {
            name: "Ada".to_string(),
            email: "not-an-email".to_string(),
            password: "secret1".to_string(),
        }),
    )
    .await;
    assert!(matches!(bad_email, Err(ApiError::ValidationError(_))));

    let short_password = handlers::register_handler(
        Extension(state.clone()),
        Json(RegisterRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "short".to_string(),
        }),
    )
    .await;
    assert!(matches!(short_password, Err(ApiError::ValidationError(_))));
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let (state, _) = test_state().await;
    register_user(&state, "Ada", "ada@example.com", "secret1").await;

    let duplicate = handlers::register_handler(
        Extension(state.clone()),
        Json(RegisterRequest {
            name: "Other Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret2".to_string(),
        }),
    )
    .await;
    assert!(matches!(duplicate, Err(ApiError::ValidationError(_))));
}

#[tokio::test]
async fn test_login_opens_session() {
    let (state, _) = test_state().await;
    register_user(&state, "Ada", "ada@example.com", "secret1").await;

    let token = login_token(&state, "ada@example.com", "secret1").await;
    assert_eq!(token.len(), 64);

    // The session row must exist server-side
    let db = state.read().await.db.clone();
    let row: Option<(String,)> = sqlx::query_as("SELECT user_id FROM sessions WHERE token = ?")
        .bind(&token)
        .fetch_optional(&db)
        .await
        .unwrap();
    assert!(row.is_some());
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let (state, _) = test_state().await;
    register_user(&state, "Ada", "ada@example.com", "secret1").await;

    let unknown = handlers::login_handler(
        Extension(state.clone()),
        Json(LoginRequest {
            email: "nobody@example.com".to_string(),
            password: "secret1".to_string(),
        }),
    )
    .await;
    assert!(matches!(unknown, Err(ApiError::Unauthorized(_))));

    let wrong = handlers::login_handler(
        Extension(state.clone()),
        Json(LoginRequest {
            email: "ada@example.com".to_string(),
            password: "wrong-password".to_string(),
        }),
    )
    .await;
    assert!(matches!(wrong, Err(ApiError::Unauthorized(_))));
}

#[tokio::test]
async fn test_session_check_reports_status() {
    let (state, _) = test_state().await;
    let (user_id, token) = seed_user(&state, "Ada", "ada@example.com", "secret1").await;

    // No token presented
    let Json(body) = handlers::session_check_handler(Extension(state.clone()), HeaderMap::new())
        .await
        .unwrap();
    assert_eq!(body["session_active"], false);

    // Valid token via cookie
    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::COOKIE,
        HeaderValue::from_str(&format!("tm_session={}", token)).unwrap(),
    );
    let Json(body) = handlers::session_check_handler(Extension(state.clone()), headers)
        .await
        .unwrap();
    assert_eq!(body["session_active"], true);
    assert_eq!(body["user_id"], serde_json::json!(user_id));
}

#[tokio::test]
async fn test_logout_destroys_session() {
    let (state, _) = test_state().await;
    let (_, token) = seed_user(&state, "Ada", "ada@example.com", "secret1").await;

    let authed = crate::test_utils::authed_user(&state, "ada@example.com").await;

    handlers::logout_handler(Extension(state.clone()), authed)
        .await
        .unwrap();

    let db = state.read().await.db.clone();
    let row: Option<(String,)> = sqlx::query_as("SELECT user_id FROM sessions WHERE token = ?")
        .bind(&token)
        .fetch_optional(&db)
        .await
        .unwrap();
    assert!(row.is_none());
}
