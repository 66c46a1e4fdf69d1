//! Student CRUD routes.

use crate::handlers::student::{create, list, read, update};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn student_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/student", post(create))
        .route("/api/student/:id", get(read).put(update))
        .route("/api/students", get(list))
        .with_state(state)
}
