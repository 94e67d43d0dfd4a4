//! Language model abstraction and providers.
//!
//! The scoring engine treats text generation as a capability: an ordered
//! list of role-tagged messages plus sampling parameters in, one free-text
//! string out. [`base_llm::LanguageModel`] is that capability; `providers`
//! holds the concrete network-backed implementations. Tests substitute
//! deterministic stubs.

pub mod base_llm;
pub mod providers;

pub use base_llm::{ChatMessage, GenerationParams, LanguageModel, LlmError, MessageRole};
