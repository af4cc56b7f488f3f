use super::handlers;
use axum::{routing::post, Router};

/// Creates the verification router
pub fn verification_routes() -> Router {
    Router::new().route("/api/verification", post(handlers::verification_handler))
}
