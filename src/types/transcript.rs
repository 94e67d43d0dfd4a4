//! Conversation transcript types.
//!
//! A training session produces an ordered list of turns alternating between
//! the trainee and the AI persona. Conversation order is significant and is
//! preserved verbatim into the evaluation request.

use serde::{Deserialize, Serialize};

/// Who produced a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeakerRole {
    /// The human being trained.
    Trainee,
    /// The scripted AI roleplay partner.
    Persona,
}

impl SpeakerRole {
    /// Label used when rendering the transcript for evaluation.
    pub fn display_label(&self) -> &'static str {
        match self {
            SpeakerRole::Trainee => "Trainee",
            SpeakerRole::Persona => "AI Persona",
        }
    }
}

impl std::fmt::Display for SpeakerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_label())
    }
}

/// One turn in a training conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Who spoke.
    pub role: SpeakerRole,
    /// What was said.
    pub content: String,
}

impl TranscriptEntry {
    /// Create a trainee turn.
    pub fn trainee(content: impl Into<String>) -> Self {
        Self {
            role: SpeakerRole::Trainee,
            content: content.into(),
        }
    }

    /// Create a persona turn.
    pub fn persona(content: impl Into<String>) -> Self {
        Self {
            role: SpeakerRole::Persona,
            content: content.into(),
        }
    }
}
