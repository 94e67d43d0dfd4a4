//! Error types for conversation scoring.

use thiserror::Error;

use crate::llms::LlmError;

/// Failures surfaced by a scoring call.
///
/// All three kinds propagate synchronously to the caller; no fallback
/// result is ever synthesized in their place. `Generation` is a recoverable
/// condition the caller may retry wholesale; `MalformedResponse` is a
/// distinct user-visible state so persistent bad output can be escalated
/// instead of blindly retried.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// The scoring inputs were rejected before any external call.
    #[error("invalid scoring input: {reason}")]
    InvalidInput { reason: String },

    /// The generation collaborator call failed (transport, auth, rate limit).
    #[error("generation call failed: {0}")]
    Generation(#[from] LlmError),

    /// The collaborator responded, but the text could not be coerced into
    /// the expected evaluation shape.
    #[error("malformed evaluation response: {reason}")]
    MalformedResponse { reason: String },
}

impl ScoringError {
    /// Shorthand for an input-validation rejection.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Shorthand for a malformed-response rejection.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }
}
