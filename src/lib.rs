//! # Persona Trainer Core
//!
//! The AI core of a training-simulation product: trainees hold roleplay
//! conversations with scripted personas, and finished transcripts are
//! scored against weighted rubrics by a language-model evaluator.
//!
//! The crate is a library with three layers:
//! - [`llms`]: the text-generation capability trait and the OpenAI-backed
//!   provider; tests substitute deterministic stubs.
//! - [`scoring`]: the evaluation prompt builder and the scoring pipeline
//!   (parse, clamp, weight, classify).
//! - [`utilities`]: prompt construction for the roleplay side, model
//!   output conversion, and the error taxonomy.
//!
//! Persistence, authentication, UI, and audio belong to the embedding
//! application and never appear here; rubrics and transcripts arrive as
//! explicit parameters.

pub mod llms;
pub mod scoring;
pub mod types;
pub mod utilities;

// Re-exports for the common call path
pub use llms::base_llm::{ChatMessage, GenerationParams, LanguageModel, LlmError, MessageRole};
pub use llms::providers::openai::OpenAiCompletion;
pub use scoring::evaluator::ConversationScorer;
pub use scoring::prompt::EvaluationPrompt;
pub use scoring::{PerformanceLevel, RubricScore, ScoringResult};
pub use types::rubric::Rubric;
pub use types::transcript::{SpeakerRole, TranscriptEntry};
pub use utilities::errors::ScoringError;
pub use utilities::prompts::RoleplayPrompt;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
