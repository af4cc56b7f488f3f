use super::handlers;
use axum::{
    routing::{get, post},
    Router,
};

/// Creates the tasks router
pub fn tasks_routes() -> Router {
    Router::new()
        .route(
            "/api/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route("/api/tasks/delete", post(handlers::delete_task))
}
