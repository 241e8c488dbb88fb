use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::store::StoreError;

const QUOTA_MESSAGE: &str = "Our AI assistant is currently unavailable because we've run out of usage credits. We're working on getting it back online. Please try again later!";
const UNEXPECTED_MESSAGE: &str = "Something went wrong while trying to analyze the job description. Please try again later.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Completion provider credential is not configured")]
    MissingCredential,

    #[error("Completion provider quota exceeded")]
    QuotaExceeded,

    #[error("Completion provider returned no content")]
    EmptyAiResponse,

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn job_not_found() -> Self {
        AppError::NotFound("Job not found".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::QuotaExceeded => StatusCode::TOO_MANY_REQUESTS,
            AppError::MissingCredential
            | AppError::EmptyAiResponse
            | AppError::Llm(_)
            | AppError::Storage(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> Value {
        match self {
            AppError::NotFound(msg) => json!({ "error": msg }),
            AppError::MissingCredential => json!({
                "error": "Missing OpenAI API key",
                "message": "The system is missing a required configuration key."
            }),
            AppError::QuotaExceeded => json!({
                "error": "Quota Exceeded",
                "message": QUOTA_MESSAGE
            }),
            AppError::EmptyAiResponse => json!({ "error": "No AI response" }),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                json!({
                    "error": "Unexpected server error",
                    "message": UNEXPECTED_MESSAGE
                })
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                json!({
                    "error": "Storage error",
                    "message": "The job list could not be saved."
                })
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                json!({
                    "error": "Unexpected server error",
                    "message": "An internal server error occurred"
                })
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
