//! Conversion of model output text into structured values.
//!
//! Generation output frequently arrives wrapped in a Markdown code fence
//! even when the prompt asks for bare JSON. The helpers here strip that
//! wrapping and perform a strict typed parse; anything that fails the
//! strict parse is reported as a converter error rather than repaired.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Error raised when model output cannot be parsed into the expected shape.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ConverterError {
    pub message: String,
}

impl ConverterError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json)?\n?|\n?```").expect("valid fence regex"));

/// Remove surrounding Markdown code-fence markers from model output.
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text.trim(), "").trim().to_string()
}

/// Strip fences and strictly parse the remainder into `T`.
pub fn parse_structured<T: DeserializeOwned>(text: &str) -> Result<T, ConverterError> {
    let cleaned = strip_code_fences(text);
    serde_json::from_str(&cleaned)
        .map_err(|e| ConverterError::new(format!("JSON parse error: {}", e)))
}
