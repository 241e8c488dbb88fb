use std::sync::Arc;

use crate::jobs::JobService;
use crate::llm_client::CompletionProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub jobs: JobService,
    /// `None` when `OPENAI_API_KEY` is not set; analysis then fails per request.
    pub llm: Option<Arc<dyn CompletionProvider>>,
}
