pub mod health;
pub mod ui;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::jobs::handlers as jobs;
use crate::state::AppState;

/// JSON API routes, mounted both at the root and under `/api`.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/jobs/:id",
            put(jobs::handle_update_job).delete(jobs::handle_delete_job),
        )
        .route("/analyze", post(analysis::handle_analyze))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ui::index_handler))
        .route("/health", get(health::health_handler))
        .merge(api_routes())
        .nest("/api", api_routes())
        .with_state(state)
}
