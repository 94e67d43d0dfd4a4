//! Evaluation prompt construction.
//!
//! Pure transformation of (transcript, rubrics) into the request handed to
//! the generation collaborator. The rubric enumeration order in the user
//! payload equals the input rubric order; the evaluator maps the response
//! back onto rubrics by position, so reordering here would misattribute
//! every score.

use serde::{Deserialize, Serialize};

use crate::llms::ChatMessage;
use crate::types::rubric::Rubric;
use crate::types::transcript::TranscriptEntry;

/// Fixed system instruction establishing the evaluator persona.
pub const EVALUATOR_SYSTEM_PROMPT: &str = "You are an expert training evaluator. \
    Analyze conversations and provide detailed, constructive feedback based on \
    specific rubrics. Be fair, objective, and provide actionable insights. \
    Always respond with valid JSON.";

/// A rendered evaluation request: system instruction plus user payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationPrompt {
    /// The evaluator-persona system instruction.
    pub system: String,
    /// Transcript, rubric list, and formatting instructions.
    pub user: String,
}

impl EvaluationPrompt {
    /// Render the evaluation request for a finished conversation.
    ///
    /// Deterministic and side-effect free. Input validation (non-empty
    /// rubric list, usable ranges) is the evaluator's job; an empty rubric
    /// slice here simply renders an empty rubric section.
    pub fn build(transcript: &[TranscriptEntry], rubrics: &[Rubric]) -> Self {
        let conversation_text = transcript
            .iter()
            .map(|entry| format!("{}: {}", entry.role.display_label(), entry.content))
            .collect::<Vec<_>>()
            .join("\n\n");

        let rubric_text = rubrics
            .iter()
            .enumerate()
            .map(|(index, rubric)| {
                format!(
                    "\n{}. {}\n   Description: {}\n   Score Range: {} to {}\n   Weight: {}\n",
                    index + 1,
                    rubric.metric_name,
                    rubric.description,
                    rubric.min_score,
                    rubric.max_score,
                    rubric.weight,
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let user = format!(
            "You are an expert training evaluator. Analyze the following conversation \
             transcript and score the trainee's performance based on the provided rubrics.\n\
             \n\
             CONVERSATION TRANSCRIPT:\n\
             {conversation_text}\n\
             \n\
             RUBRICS TO EVALUATE:\n\
             {rubric_text}\n\
             \n\
             INSTRUCTIONS:\n\
             For each rubric, provide:\n\
             1. A score within the specified range\n\
             2. Specific feedback explaining the score\n\
             3. Evidence from the conversation (specific quotes or examples)\n\
             \n\
             Also provide:\n\
             - Overall feedback on the trainee's performance\n\
             - 2-3 key strengths demonstrated\n\
             - 2-3 areas for improvement\n\
             \n\
             Respond in the following JSON format:\n\
             {{\n\
             \x20 \"rubric_scores\": [\n\
             \x20   {{\n\
             \x20     \"score\": number,\n\
             \x20     \"feedback\": \"detailed feedback here\",\n\
             \x20     \"evidence\": [\"quote 1\", \"quote 2\"]\n\
             \x20   }}\n\
             \x20 ],\n\
             \x20 \"overall_feedback\": \"overall feedback here\",\n\
             \x20 \"strengths\": [\"strength 1\", \"strength 2\"],\n\
             \x20 \"areas_for_improvement\": [\"area 1\", \"area 2\"]\n\
             }}\n\
             The rubric_scores array must contain exactly one entry per rubric, \
             in the order the rubrics are listed above."
        );

        Self {
            system: EVALUATOR_SYSTEM_PROMPT.to_string(),
            user,
        }
    }

    /// The request as role-tagged messages for the generation call.
    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(&self.system),
            ChatMessage::user(&self.user),
        ]
    }
}
