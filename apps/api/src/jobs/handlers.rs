//! Axum route handlers for the Job API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::models::job::{Job, JobPatch, NewJob};
use crate::state::AppState;

/// GET /jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Json<Vec<Job>> {
    Json(state.jobs.list().await)
}

/// POST /jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(new_job): Json<NewJob>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let job = state.jobs.create(new_job).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// PUT /jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<JobPatch>,
) -> Result<Json<Job>, AppError> {
    let job = state.jobs.update(parse_job_id(&id)?, patch).await?;
    Ok(Json(job))
}

/// DELETE /jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.jobs.delete(parse_job_id(&id)?).await?;
    Ok(Json(json!({ "message": "Job deleted" })))
}

/// A path segment that is not an integer cannot name any stored job.
fn parse_job_id(raw: &str) -> Result<i64, AppError> {
    raw.trim().parse().map_err(|_| AppError::job_not_found())
}
