/// LLM Client - the single point of entry for chat-completion calls.
///
/// No other module talks to the upstream provider directly. The Analysis
/// Gateway depends on the `CompletionProvider` trait, which `LlmClient`
/// implements against an OpenAI-compatible `/chat/completions` endpoint.
///
/// One request per call: no retries, no caching.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

pub mod prompts;

/// Error code the provider uses when the account has run out of credits.
const QUOTA_ERROR_CODE: &str = "insufficient_quota";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Provider quota exhausted")]
    QuotaExceeded,

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Anything that can turn a prompt into model text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ApiErrorBody>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    code: Option<Value>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl ApiErrorBody {
    fn is_quota(&self) -> bool {
        self.code.as_ref().and_then(Value::as_str) == Some(QUOTA_ERROR_CODE)
            || self.kind.as_deref() == Some(QUOTA_ERROR_CODE)
    }
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
}

/// Chat-completion client configured from `OPENAI_*` settings.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl LlmClient {
    pub fn new(
        api_key: String,
        api_url: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            api_url,
            model,
        })
    }

    /// Builds a client when a credential is configured; `Ok(None)` otherwise.
    pub fn from_config(config: &Config) -> Result<Option<Self>, LlmError> {
        config
            .openai_api_key
            .clone()
            .map(|key| {
                Self::new(
                    key,
                    config.openai_api_url.clone(),
                    config.openai_model.clone(),
                    Duration::from_secs(config.llm_timeout_secs),
                )
            })
            .transpose()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one user prompt and returns the first choice's text.
    pub async fn call(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompts::JSON_ONLY_SYSTEM,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("Raw completion response (status {status}): {body}");

        interpret_response(status, &body)
    }
}

#[async_trait]
impl CompletionProvider for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.call(prompt).await
    }
}

/// Maps a raw provider reply onto the reply text or a typed failure.
/// A quota error wins over everything else, whatever the HTTP status.
fn interpret_response(status: u16, body: &str) -> Result<String, LlmError> {
    let is_success = (200..300).contains(&status);

    let parsed: ChatResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) if !is_success => {
            return Err(LlmError::Api {
                status,
                message: body.to_string(),
            })
        }
        Err(e) => return Err(LlmError::Parse(e)),
    };

    if let Some(error) = parsed.error {
        if error.is_quota() {
            return Err(LlmError::QuotaExceeded);
        }
        return Err(LlmError::Api {
            status,
            message: error.message,
        });
    }

    if !is_success {
        return Err(LlmError::Api {
            status,
            message: body.to_string(),
        });
    }

    if let Some(usage) = &parsed.usage {
        debug!(
            "LLM call succeeded: prompt_tokens={:?}, completion_tokens={:?}",
            usage.prompt_tokens, usage.completion_tokens
        );
    }

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or(LlmError::EmptyContent)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
