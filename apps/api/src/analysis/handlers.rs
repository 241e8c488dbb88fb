use axum::{extract::State, Json};
use serde::Deserialize;

use crate::analysis::{analyze, AnalysisResult};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub job_description: String,
}

/// POST /analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    let result = analyze(state.llm.as_deref(), &request.job_description).await?;
    Ok(Json(result))
}
