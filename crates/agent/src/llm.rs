//! LLM collaborator: the `LlmClient` trait and an OpenAI-compatible client.
//!
//! The pipeline treats the model as an opaque succeed-or-fail text
//! completion. No retries, backoff, or timeouts are layered on here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default chat-completions base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model identifier (OpenRouter-style naming).
pub const DEFAULT_MODEL: &str = "openai/gpt-4-turbo-preview";

/// Error type for LLM client operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// No API key was available.
    #[error("{0}")]
    NotConfigured(String),
    /// Network or transport failure.
    #[error("LLM network error: {0}")]
    Network(String),
    /// The API answered with a non-success status.
    #[error("LLM API error ({status}): {message}")]
    Api { status: u16, message: String },
    /// The API response body could not be decoded.
    #[error("LLM parse error: {0}")]
    Parse(String),
    #[error("LLM internal error: {0}")]
    Internal(String),
}

/// Requested response format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    Json,
}

/// A single completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub response_format: ResponseFormat,
}

impl LlmRequest {
    /// Create a text request with default sampling (0.7, 2000 tokens).
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            temperature: 0.7,
            max_tokens: 2000,
            response_format: ResponseFormat::Text,
        }
    }

    /// Ask for a JSON object response.
    pub fn json(mut self) -> Self {
        self.response_format = ResponseFormat::Json;
        self
    }
}

/// Token accounting reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Completion text plus optional usage.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    pub content: String,
    pub usage: Option<Usage>,
}

/// Trait for calling an LLM to get a text completion.
///
/// Injected into the orchestrator so tests can substitute a fake.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError>;
}

/// Connection settings for [`OpenAiClient`].
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key. `None` makes every call fail with [`LlmError::NotConfigured`].
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl OpenAiConfig {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Read `OPENAI_API_KEY` and `OPENAI_BASE_URL`.
    pub fn from_env() -> Self {
        let mut config = Self::new(
            std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
        );
        if let Some(url) = std::env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|u| !u.is_empty())
        {
            config.base_url = url;
        }
        config
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Chat-completions client for OpenAI-compatible endpoints.
pub struct OpenAiClient {
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self { config }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let api_key = self.config.api_key.clone().ok_or_else(|| {
            LlmError::NotConfigured("OPENAI_API_KEY environment variable is not set".to_string())
        })?;
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let body = build_request_body(&self.config.model, &request);

        tracing::debug!(model = %self.config.model, url = %url, "calling chat completions");

        // ureq is synchronous, so wrap in spawn_blocking
        tokio::task::spawn_blocking(move || call_chat_completions(&url, &api_key, &body))
            .await
            .map_err(|e| LlmError::Internal(format!("task join error: {}", e)))?
    }
}

// ── Wire format ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ApiMessage>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ApiResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ApiResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
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

fn build_request_body(model: &str, request: &LlmRequest) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: vec![
            ApiMessage {
                role: "system",
                content: request.system_prompt.clone(),
            },
            ApiMessage {
                role: "user",
                content: request.user_prompt.clone(),
            },
        ],
        temperature: request.temperature,
        max_tokens: request.max_tokens,
        response_format: match request.response_format {
            ResponseFormat::Json => Some(ApiResponseFormat {
                kind: "json_object",
            }),
            ResponseFormat::Text => None,
        },
    }
}

fn call_chat_completions(
    url: &str,
    api_key: &str,
    body: &ChatCompletionRequest,
) -> Result<LlmResponse, LlmError> {
    let agent = ureq::Agent::new_with_defaults();
    let response = agent
        .post(url)
        .header("authorization", &format!("Bearer {}", api_key))
        .header("content-type", "application/json")
        .send_json(body)
        .map_err(|e| match e {
            ureq::Error::StatusCode(status) => LlmError::Api {
                status,
                message: "request rejected by provider".to_string(),
            },
            other => LlmError::Network(other.to_string()),
        })?;

    let parsed: ChatCompletionResponse = response
        .into_body()
        .read_json()
        .map_err(|e| LlmError::Parse(format!("failed to parse API response: {}", e)))?;

    Ok(into_llm_response(parsed))
}

/// First choice's content (empty when absent) plus usage.
fn into_llm_response(parsed: ChatCompletionResponse) -> LlmResponse {
    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .unwrap_or_default();
    LlmResponse {
        content,
        usage: parsed.usage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults() {
        let req = LlmRequest::new("sys", "user");
        assert_eq!(req.temperature, 0.7);
        assert_eq!(req.max_tokens, 2000);
        assert_eq!(req.response_format, ResponseFormat::Text);
        assert_eq!(req.json().response_format, ResponseFormat::Json);
    }

    #[test]
    fn json_request_body_sets_response_format() {
        let body = build_request_body("m", &LlmRequest::new("sys", "hi").json());
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], "m");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][0]["content"], "sys");
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["response_format"]["type"], "json_object");
        assert_eq!(value["max_tokens"], 2000);
    }

    #[test]
    fn text_request_body_omits_response_format() {
        let body = build_request_body("m", &LlmRequest::new("sys", "hi"));
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("response_format").is_none());
    }

    #[test]
    fn extracts_first_choice_and_usage() {
        let parsed: ChatCompletionResponse = serde_json::from_str(
            r#"{
              "choices": [{"message": {"role": "assistant", "content": "{\"structure\":\"single\"}"}}],
              "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
            }"#,
        )
        .unwrap();
        let response = into_llm_response(parsed);
        assert_eq!(response.content, r#"{"structure":"single"}"#);
        assert_eq!(response.usage.unwrap().total_tokens, 15);
    }

    #[test]
    fn missing_choices_yield_empty_content() {
        let parsed: ChatCompletionResponse = serde_json::from_str("{}").unwrap();
        let response = into_llm_response(parsed);
        assert!(response.content.is_empty());
        assert!(response.usage.is_none());
    }

    #[tokio::test]
    async fn unconfigured_client_fails_without_network() {
        let client = OpenAiClient::new(OpenAiConfig::new(None));
        match client.complete(LlmRequest::new("s", "u")).await {
            Err(LlmError::NotConfigured(msg)) => assert!(msg.contains("OPENAI_API_KEY")),
            other => panic!("expected NotConfigured, got {:?}", other),
        }
    }

    #[test]
    fn error_display() {
        let err = LlmError::Api {
            status: 401,
            message: "bad key".to_string(),
        };
        assert_eq!(err.to_string(), "LLM API error (401): bad key");
        assert_eq!(
            LlmError::Network("refused".to_string()).to_string(),
            "LLM network error: refused"
        );
    }
}
