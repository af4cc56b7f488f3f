use super::handlers;
use axum::{routing::post, Router};

/// Creates the password reset router
pub fn password_reset_routes() -> Router {
    Router::new()
        .route("/api/password-reset/request", post(handlers::request_reset))
        .route("/api/password-reset/consume", post(handlers::consume_reset))
}
