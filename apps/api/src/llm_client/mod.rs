/// LLM Client — the single point of entry for all model calls in the screener.
///
/// ARCHITECTURAL RULE: No other module may call a model provider directly.
/// Scoring code talks to the `LlmService` trait; `LlmClient` is the production
/// implementation (Anthropic Messages API for text, an OpenAI-style embeddings
/// endpoint for vectors).
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;
pub mod structured;

pub use structured::{generate_structured, StructuredOutput};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const EMBEDDING_API_URL: &str = "https://api.voyageai.com/v1/embeddings";
/// The model used for all generation calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-sonnet-4-5";
const DEFAULT_MAX_TOKENS: u32 = 2048;
const MAX_RETRIES: u32 = 3;
/// Embedding inputs are truncated to this many characters.
const MAX_EMBED_CHARS: usize = 10_000;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Malformed response after {attempts} attempts: {message}")]
    MalformedResponse { attempts: u32, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Embedding service is not configured")]
    EmbeddingUnavailable,
}

impl LlmError {
    /// Rate limits and server-side failures are worth another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::RateLimited { .. } => true,
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            LlmError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// A single text-generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest<'a> {
    pub prompt: &'a str,
    pub system: &'a str,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

/// Model capabilities the scoring core depends on.
#[async_trait]
pub trait LlmService: Send + Sync {
    async fn generate_text(&self, request: TextRequest<'_>) -> Result<String, LlmError>;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: Vec<&'a str>,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Credentials for the embedding endpoint. Absent → `embed` is disabled.
#[derive(Debug, Clone)]
pub struct EmbeddingSettings {
    pub api_key: String,
    pub model: String,
}

/// Production `LlmService`: wraps the Anthropic Messages API with retry logic.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    embedding: Option<EmbeddingSettings>,
}

impl LlmClient {
    pub fn new(api_key: String, embedding: Option<EmbeddingSettings>) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()?,
            api_key,
            embedding,
        })
    }

    /// One Messages API call, returning the full response object.
    pub async fn call(&self, request: &TextRequest<'_>) -> Result<LlmResponse, LlmError> {
        let body = AnthropicRequest {
            model: MODEL,
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: request.temperature,
            system: request.system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: request.prompt,
            }],
        };

        let response = self
            .send_with_retry("Messages API", || {
                self.client
                    .post(ANTHROPIC_API_URL)
                    .header("x-api-key", &self.api_key)
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .json(&body)
            })
            .await?;

        let llm_response: LlmResponse = response.json().await?;
        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );
        Ok(llm_response)
    }

    /// Sends the request built by `build`, retrying rate limits, 5xx responses
    /// and timeouts with exponential backoff. Other failures return at once.
    async fn send_with_retry(
        &self,
        endpoint: &str,
        build: impl Fn() -> RequestBuilder,
    ) -> Result<Response, LlmError> {
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                backoff(attempt).await;
            }

            let response = match build().send().await {
                Ok(r) => r,
                Err(e) => {
                    let error = LlmError::Http(e);
                    if !error.is_transient() {
                        return Err(error);
                    }
                    last_error = Some(error);
                    continue;
                }
            };

            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            let body = response.text().await.unwrap_or_default();
            let error = if status == StatusCode::TOO_MANY_REQUESTS {
                LlmError::RateLimited {
                    retries: attempt + 1,
                }
            } else {
                LlmError::Api {
                    status: status.as_u16(),
                    message: api_error_message(body),
                }
            };
            if !error.is_transient() {
                return Err(error);
            }
            warn!("{} returned {}: {}", endpoint, status, error);
            last_error = Some(error);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl LlmService for LlmClient {
    async fn generate_text(&self, request: TextRequest<'_>) -> Result<String, LlmError> {
        let response = self.call(&request).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        Ok(text.to_string())
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let settings = self
            .embedding
            .as_ref()
            .ok_or(LlmError::EmbeddingUnavailable)?;
        let body = EmbeddingRequest {
            input: vec![truncate_chars(text, MAX_EMBED_CHARS)],
            model: &settings.model,
        };

        let response = self
            .send_with_retry("Embeddings API", || {
                self.client
                    .post(EMBEDDING_API_URL)
                    .bearer_auth(&settings.api_key)
                    .json(&body)
            })
            .await?;

        let parsed: EmbeddingResponse = response.json().await?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .filter(|v| !v.is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}

/// Pulls `error.message` out of an Anthropic-style error body, else the raw body.
fn api_error_message(body: String) -> String {
    serde_json::from_str::<AnthropicError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

/// Exponential backoff: 1s, 2s, 4s
async fn backoff(attempt: u32) {
    let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
    warn!(
        "LLM call attempt {} failed, retrying after {}ms...",
        attempt,
        delay.as_millis()
    );
    tokio::time::sleep(delay).await;
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub(crate) fn strip_json_fences(text: &str) -> &str {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_transient_classification() {
        assert!(LlmError::RateLimited { retries: 3 }.is_transient());
        assert!(LlmError::Api {
            status: 503,
            message: String::new()
        }
        .is_transient());
        assert!(!LlmError::Api {
            status: 400,
            message: String::new()
        }
        .is_transient());
        assert!(!LlmError::MalformedResponse {
            attempts: 3,
            message: String::new()
        }
        .is_transient());
    }

    #[test]
    fn test_api_error_message_prefers_structured_body() {
        let body = r#"{"type": "error", "error": {"type": "invalid_request_error", "message": "max_tokens too large"}}"#;
        assert_eq!(api_error_message(body.to_string()), "max_tokens too large");
        assert_eq!(api_error_message("gateway timeout".to_string()), "gateway timeout");
    }

    #[test]
    fn test_anthropic_response_text_picks_first_text_block() {
        let json = r#"{
            "content": [
                {"type": "tool_use"},
                {"type": "text", "text": "hello"}
            ],
            "usage": {"input_tokens": 3, "output_tokens": 1}
        }"#;
        let response: LlmResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some("hello"));
    }
}
