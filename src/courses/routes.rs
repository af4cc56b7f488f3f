use super::handlers;
use axum::{
    routing::{get, post},
    Router,
};

/// Creates the courses router
pub fn courses_routes() -> Router {
    Router::new()
        .route(
            "/api/courses",
            get(handlers::list_courses).post(handlers::create_course),
        )
        .route("/api/courses/delete", post(handlers::delete_course))
}
