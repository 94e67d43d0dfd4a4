//! Base abstraction for language model implementations.
//!
//! Defines the message and parameter types shared by all providers and the
//! [`LanguageModel`] trait the scoring engine is written against. Custom
//! implementations should handle error cases gracefully, including
//! timeouts, authentication failures, and malformed provider responses.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Role tag for a chat message, in provider wire casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A single message in a model conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sampling parameters
// ---------------------------------------------------------------------------

/// Sampling parameters for a generation call.
///
/// Unset fields defer to the provider's defaults.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Sampling temperature.
    pub temperature: Option<f64>,
    /// Maximum tokens in the response.
    pub max_tokens: Option<u32>,
}

impl GenerationParams {
    /// Create parameters with both fields set.
    pub fn new(temperature: f64, max_tokens: u32) -> Self {
        Self {
            temperature: Some(temperature),
            max_tokens: Some(max_tokens),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure of a generation call at the provider boundary.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key was configured for the provider.
    #[error("API key not configured for provider '{provider}'")]
    MissingApiKey { provider: String },

    /// The request could not be sent or the response body read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider rejected the request with HTTP 429.
    #[error("rate limited by provider (429)")]
    RateLimited,

    /// The provider returned a non-success status.
    #[error("provider API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider response carried no completion text.
    #[error("no completion content in provider response")]
    EmptyCompletion,
}

// ---------------------------------------------------------------------------
// LanguageModel trait
// ---------------------------------------------------------------------------

/// Capability trait for text generation.
///
/// Implementations issue one completion request per `generate` call and
/// return the raw text. No retry or response-shape interpretation happens
/// at this level; callers own both.
#[async_trait]
pub trait LanguageModel: Send + Sync + fmt::Debug {
    /// Get the model identifier/name.
    fn model(&self) -> &str;

    /// Generate a completion for the given messages.
    async fn generate(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<String, LlmError>;
}
