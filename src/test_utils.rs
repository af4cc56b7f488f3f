// Shared test fixtures: in-memory database, app state, seeded sessions.

use axum::extract::{Extension, Json};
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::handlers as auth_handlers;
use crate::auth::models::{LoginRequest, RegisterRequest};
use crate::common::{migrations, AppState};
use crate::services::{MailService, MockTransport};

/// Fresh app state over an in-memory database with the real schema and a
/// recording mail transport.
pub async fn test_state() -> (Arc<RwLock<AppState>>, Arc<MockTransport>) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    migrations::run_migrations(&pool).await.expect("migrations");

    let transport = Arc::new(MockTransport::new());
    let state = AppState {
        db: pool,
        mail: Arc::new(MailService::new(transport.clone())),
        app_base_url: "http://localhost:3000".to_string(),
        session_ttl_hours: 24,
    };

    (Arc::new(RwLock::new(state)), transport)
}

pub async fn register_user(
    state: &Arc<RwLock<AppState>>,
    name: &str,
    email: &str,
    password: &str,
) {
    auth_handlers::register_handler(
        Extension(state.clone()),
        Json(RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }),
    )
    .await
    .expect("registration succeeds");
}

/// Login and return the raw session token from the Set-Cookie header
pub async fn login_token(state: &Arc<RwLock<AppState>>, email: &str, password: &str) -> String {
    let response = auth_handlers::login_handler(
        Extension(state.clone()),
        Json(LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }),
    )
    .await
    .expect("login succeeds")
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .expect("session cookie set")
        .to_str()
        .unwrap()
        .to_string();

    cookie
        .split(';')
        .next()
        .and_then(|kv| kv.strip_prefix("tm_session="))
        .expect("cookie carries session token")
        .to_string()
}

/// Register + login a user; returns (user_id, session_token)
pub async fn seed_user(
    state: &Arc<RwLock<AppState>>,
    name: &str,
    email: &str,
    password: &str,
) -> (String, String) {
    register_user(state, name, email, password).await;
    let token = login_token(state, email, password).await;

    let db = state.read().await.db.clone();
    let (user_id,): (String,) = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(email.to_lowercase())
        .fetch_one(&db)
        .await
        .expect("seeded user exists");

    (user_id, token)
}

/// Convenience AuthedUser for calling protected handlers directly
pub async fn authed_user(state: &Arc<RwLock<AppState>>, email: &str) -> crate::auth::AuthedUser {
    let db = state.read().await.db.clone();
    let (user_id, name): (String, String) =
        sqlx::query_as("SELECT id, name FROM users WHERE email = ?")
            .bind(email.to_lowercase())
            .fetch_one(&db)
            .await
            .expect("user exists");

    let (token,): (String,) = sqlx::query_as("SELECT token FROM sessions WHERE user_id = ?")
        .bind(&user_id)
        .fetch_one(&db)
        .await
        .expect("session exists");

    crate::auth::AuthedUser {
        user_id,
        email: email.to_lowercase(),
        name,
        session_token: token,
    }
}
