use super::handlers;
use axum::{
    routing::{get, post},
    Router,
};

/// Creates the profile router
pub fn profile_routes() -> Router {
    Router::new()
        .route("/api/profile/name", get(handlers::get_user_name))
        .route("/api/profile/update", post(handlers::update_profile))
        .route("/api/profile/email", post(handlers::update_email))
}
