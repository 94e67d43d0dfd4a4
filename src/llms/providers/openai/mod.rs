//! OpenAI chat-completions provider.
//!
//! Direct integration with the OpenAI Chat Completions API via `reqwest`.
//! One request per `generate` call; retry policy belongs to the caller, so
//! transport and status failures are mapped to typed [`LlmError`] variants
//! instead of being retried here.

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::llms::base_llm::{ChatMessage, GenerationParams, LanguageModel, LlmError};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: f64 = 120.0;

/// OpenAI chat-completions implementation of [`LanguageModel`].
///
/// # Example
///
/// ```ignore
/// let provider = OpenAiCompletion::new("gpt-4o", None, None);
/// let text = provider.generate(&messages, &params).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OpenAiCompletion {
    /// Model name (e.g., "gpt-4o").
    model: String,
    /// API key; `None` fails the call with `MissingApiKey`.
    api_key: Option<String>,
    /// Custom base URL, for proxies and compatible endpoints.
    base_url: Option<String>,
    /// Organization ID for multi-tenant access.
    pub organization: Option<String>,
    /// Request timeout in seconds.
    pub timeout: f64,
}

impl OpenAiCompletion {
    /// Create a new provider.
    ///
    /// # Arguments
    ///
    /// * `model` - OpenAI model name (e.g., "gpt-4o").
    /// * `api_key` - Optional API key (defaults to `OPENAI_API_KEY` env var).
    /// * `base_url` - Optional custom base URL.
    pub fn new(
        model: impl Into<String>,
        api_key: Option<String>,
        base_url: Option<String>,
    ) -> Self {
        let api_key = api_key.or_else(|| std::env::var("OPENAI_API_KEY").ok());

        Self {
            model: model.into(),
            api_key,
            base_url,
            organization: std::env::var("OPENAI_ORGANIZATION").ok(),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Get the API base URL.
    pub fn api_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
    }

    /// Build the request body for the Chat Completions API.
    pub fn build_request_body(&self, messages: &[ChatMessage], params: &GenerationParams) -> Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
        });

        if let Some(temp) = params.temperature {
            body["temperature"] = serde_json::json!(temp);
        }
        if let Some(max_tokens) = params.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        body
    }

    /// Extract the completion text from a Chat Completions response.
    fn parse_completions_response(&self, response: &Value) -> Result<String, LlmError> {
        let content = response
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .ok_or(LlmError::EmptyCompletion)?;

        if let Some(usage) = response.get("usage") {
            log::debug!(
                "OpenAI token usage: prompt={}, completion={}, total={}",
                usage.get("prompt_tokens").and_then(|v| v.as_i64()).unwrap_or(0),
                usage.get("completion_tokens").and_then(|v| v.as_i64()).unwrap_or(0),
                usage.get("total_tokens").and_then(|v| v.as_i64()).unwrap_or(0),
            );
        }

        Ok(content.to_string())
    }
}

#[async_trait]
impl LanguageModel for OpenAiCompletion {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<String, LlmError> {
        let call_id = Uuid::new_v4();
        log::debug!(
            "OpenAiCompletion.generate: model={}, call_id={}, messages={}",
            self.model,
            call_id,
            messages.len(),
        );

        let api_key = self.api_key.as_ref().ok_or_else(|| LlmError::MissingApiKey {
            provider: "openai".to_string(),
        })?;

        let body = self.build_request_body(messages, params);
        let endpoint = format!("{}/chat/completions", self.api_base_url());

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs_f64(self.timeout))
            .build()?;

        let mut request = client
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", api_key));

        if let Some(ref org) = self.organization {
            request = request.header("OpenAI-Organization", org);
        }

        let response = request.json(&body).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            log::warn!("OpenAI API rate limited: call_id={}", call_id);
            return Err(LlmError::RateLimited);
        }

        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: response_text,
            });
        }

        let response_json: Value =
            serde_json::from_str(&response_text).map_err(|e| LlmError::Api {
                status: status.as_u16(),
                message: format!(
                    "unparseable response body: {} - {}",
                    e,
                    &response_text[..response_text.len().min(500)]
                ),
            })?;

        self.parse_completions_response(&response_json)
    }
}
