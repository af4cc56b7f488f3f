//! Tests for the verification module

use chrono::{Duration, Utc};

use super::services::VerificationService;
use crate::common::ApiError;
use crate::test_utils::{seed_user, test_state};

/// Read the stored code for a session straight from the database
async fn stored_code(db: &sqlx::SqlitePool, session_token: &str) -> String {
    let (code,): (String,) =
        sqlx::query_as("SELECT code FROM verification_challenges WHERE session_token = ?")
            .bind(session_token)
            .fetch_one(db)
            .await
            .expect("challenge exists");
    code
}

#[tokio::test]
async fn test_issue_sends_six_digit_code() {
    let (state, transport) = test_state().await;
    let (_, session) = seed_user(&state, "Ada", "ada@example.com", "secret1").await;
    let app_state = state.read().await.clone();
    let service = VerificationService::new(app_state.db.clone());

    service
        .issue_code(&app_state.mail, &session, "ada@example.com", Utc::now())
        .await
        .unwrap();

    let code = stored_code(&app_state.db, &session).await;
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));

    // The emailed body carries the exact code, leading zeros intact
    let sent = transport.sent_mail();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].html_body.contains(&code));
}

#[tokio::test]
async fn test_issue_rejects_bad_email_and_failed_dispatch() {
    let (state, transport) = test_state().await;
    let (_, session) = seed_user(&state, "Ada", "ada@example.com", "secret1").await;
    let app_state = state.read().await.clone();
    let service = VerificationService::new(app_state.db.clone());

    let bad = service
        .issue_code(&app_state.mail, &session, "not-an-email", Utc::now())
        .await;
    assert!(matches!(bad, Err(ApiError::ValidationError(_))));

    transport.set_failing(true);
    let failed = service
        .issue_code(&app_state.mail, &session, "ada@example.com", Utc::now())
        .await;
    assert!(matches!(failed, Err(ApiError::DispatchError(_))));
}

#[tokio::test]
async fn test_verify_requires_exact_match() {
    let (state, _) = test_state().await;
    let (_, session) = seed_user(&state, "Ada", "ada@example.com", "secret1").await;
    let app_state = state.read().await.clone();
    let service = VerificationService::new(app_state.db.clone());

    let now = Utc::now();
    service
        .issue_code(&app_state.mail, &session, "ada@example.com", now)
        .await
        .unwrap();
    let code = stored_code(&app_state.db, &session).await;

    // Wrong code
    let wrong_code = format!("{:06}", (code.parse::<u32>().unwrap() + 1) % 1_000_000);
    let result = service
        .verify_code(&session, "ada@example.com", &wrong_code, now)
        .await;
    assert!(matches!(result, Err(ApiError::ValidationError(_))));

    // Wrong email
    let result = service
        .verify_code(&session, "other@example.com", &code, now)
        .await;
    assert!(matches!(result, Err(ApiError::ValidationError(_))));

    // Exact match succeeds
    service
        .verify_code(&session, "ada@example.com", &code, now)
        .await
        .unwrap();
    assert!(service
        .has_verified_email(&session, "ada@example.com")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_verify_without_challenge_is_state_error() {
    let (state, _) = test_state().await;
    let (_, session) = seed_user(&state, "Ada", "ada@example.com", "secret1").await;
    let db = state.read().await.db.clone();
    let service = VerificationService::new(db);

    let result = service
        .verify_code(&session, "ada@example.com", "123456", Utc::now())
        .await;
    assert!(matches!(result, Err(ApiError::StateError(_))));
}

#[tokio::test]
async fn test_verify_succeeds_exactly_once() {
    let (state, _) = test_state().await;
    let (_, session) = seed_user(&state, "Ada", "ada@example.com", "secret1").await;
    let app_state = state.read().await.clone();
    let service = VerificationService::new(app_state.db.clone());

    let now = Utc::now();
    service
        .issue_code(&app_state.mail, &session, "ada@example.com", now)
        .await
        .unwrap();
    let code = stored_code(&app_state.db, &session).await;

    service
        .verify_code(&session, "ada@example.com", &code, now)
        .await
        .unwrap();

    // The same code cannot be presented again
    let replay = service
        .verify_code(&session, "ada@example.com", &code, now)
        .await;
    assert!(matches!(replay, Err(ApiError::StateError(_))));
}

#[tokio::test]
async fn test_fresh_issue_invalidates_old_code() {
    let (state, _) = test_state().await;
    let (_, session) = seed_user(&state, "Ada", "ada@example.com", "secret1").await;
    let app_state = state.read().await.clone();
    let service = VerificationService::new(app_state.db.clone());

    let now = Utc::now();
    service
        .issue_code(&app_state.mail, &session, "ada@example.com", now)
        .await
        .unwrap();
    let old_code = stored_code(&app_state.db, &session).await;

    // Force a different second code to make the assertion meaningful
    loop {
        service
            .issue_code(&app_state.mail, &session, "ada@example.com", now)
            .await
            .unwrap();
        if stored_code(&app_state.db, &session).await != old_code {
            break;
        }
    }
    let new_code = stored_code(&app_state.db, &session).await;

    let stale = service
        .verify_code(&session, "ada@example.com", &old_code, now)
        .await;
    assert!(matches!(stale, Err(ApiError::ValidationError(_))));

    service
        .verify_code(&session, "ada@example.com", &new_code, now)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_expired_code_is_rejected_and_cleared() {
    let (state, _) = test_state().await;
    let (_, session) = seed_user(&state, "Ada", "ada@example.com", "secret1").await;
    let app_state = state.read().await.clone();
    let service = VerificationService::new(app_state.db.clone());

    let issued = Utc::now();
    service
        .issue_code(&app_state.mail, &session, "ada@example.com", issued)
        .await
        .unwrap();
    let code = stored_code(&app_state.db, &session).await;

    let late = issued + Duration::seconds(super::CODE_TTL_SECS + 1);
    let result = service
        .verify_code(&session, "ada@example.com", &code, late)
        .await;
    assert!(matches!(result, Err(ApiError::ExpiredError(_))));

    // The stale challenge is gone; retrying is now a state error
    let retry = service
        .verify_code(&session, "ada@example.com", &code, late)
        .await;
    assert!(matches!(retry, Err(ApiError::StateError(_))));
}

#[tokio::test]
async fn test_code_still_valid_inside_window() {
    let (state, _) = test_state().await;
    let (_, session) = seed_user(&state, "Ada", "ada@example.com", "secret1").await;
    let app_state = state.read().await.clone();
    let service = VerificationService::new(app_state.db.clone());

    let issued = Utc::now();
    service
        .issue_code(&app_state.mail, &session, "ada@example.com", issued)
        .await
        .unwrap();
    let code = stored_code(&app_state.db, &session).await;

    let almost = issued + Duration::seconds(super::CODE_TTL_SECS - 1);
    service
        .verify_code(&session, "ada@example.com", &code, almost)
        .await
        .unwrap();
}
