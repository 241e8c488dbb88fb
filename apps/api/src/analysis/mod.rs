//! Analysis Gateway - turns a pasted job description into a short summary
//! and three skills via the completion provider.
//!
//! The model is asked for `{"summary", "skills"}` JSON, but nothing forces it
//! to comply, so the reply is parsed into a tagged `AnalysisResult`: either
//! the structured shape, or the raw text kept as the summary.

pub mod handlers;
pub mod prompts;

use serde::{Deserialize, Serialize, Serializer};

use crate::errors::AppError;
use crate::llm_client::{strip_json_fences, CompletionProvider, LlmError};

pub const MAX_SKILLS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResult {
    /// The model answered with the requested JSON object.
    Structured { summary: String, skills: Vec<String> },
    /// The model answered with free text; it is returned verbatim.
    Text { summary: String },
}

impl AnalysisResult {
    pub fn summary(&self) -> &str {
        match self {
            AnalysisResult::Structured { summary, .. } | AnalysisResult::Text { summary } => {
                summary
            }
        }
    }

    pub fn skills(&self) -> &[String] {
        match self {
            AnalysisResult::Structured { skills, .. } => skills,
            AnalysisResult::Text { .. } => &[],
        }
    }
}

/// Both variants go over the wire as `{summary, skills}`.
impl Serialize for AnalysisResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire<'a> {
            summary: &'a str,
            skills: &'a [String],
        }

        Wire {
            summary: self.summary(),
            skills: self.skills(),
        }
        .serialize(serializer)
    }
}

#[derive(Deserialize)]
struct StructuredReply {
    summary: String,
    #[serde(default)]
    skills: Vec<String>,
}

/// Parses model text into a structured analysis, degrading to `Text` when the
/// reply is not a `{summary, skills}` object.
pub fn parse_analysis(text: &str) -> AnalysisResult {
    match serde_json::from_str::<StructuredReply>(strip_json_fences(text)) {
        Ok(StructuredReply { summary, mut skills }) => {
            skills.truncate(MAX_SKILLS);
            AnalysisResult::Structured { summary, skills }
        }
        Err(_) => AnalysisResult::Text {
            summary: text.to_string(),
        },
    }
}

/// Runs one analysis round trip.
///
/// `provider` is `None` when no credential is configured; that fails before
/// anything is sent upstream.
pub async fn analyze(
    provider: Option<&dyn CompletionProvider>,
    job_description: &str,
) -> Result<AnalysisResult, AppError> {
    let provider = provider.ok_or(AppError::MissingCredential)?;

    let prompt = prompts::build_analyze_prompt(job_description);
    let text = provider.complete(&prompt).await.map_err(into_app_error)?;

    let result = parse_analysis(&text);
    if matches!(result, AnalysisResult::Text { .. }) {
        tracing::warn!("Model reply was not structured JSON; returning it as summary");
    }
    Ok(result)
}

fn into_app_error(err: LlmError) -> AppError {
    match err {
        LlmError::QuotaExceeded => AppError::QuotaExceeded,
        LlmError::EmptyContent => AppError::EmptyAiResponse,
        other => AppError::Llm(other.to_string()),
    }
}
