//! Conversation scoring pipeline.
//!
//! [`ConversationScorer`] turns a finished transcript and a rubric set into
//! a [`ScoringResult`]: validate inputs, issue one generation call, parse
//! and validate the response, clamp per-rubric scores, and compute the
//! weighted aggregate. Failures propagate as [`ScoringError`]; no fallback
//! result is ever synthesized, because the result is shown to the trainee
//! as a performance judgment.

use std::sync::Arc;

use serde::Deserialize;

use crate::llms::{GenerationParams, LanguageModel};
use crate::scoring::prompt::EvaluationPrompt;
use crate::scoring::{RubricScore, ScoringResult};
use crate::types::rubric::Rubric;
use crate::types::transcript::TranscriptEntry;
use crate::utilities::converter;
use crate::utilities::errors::ScoringError;

/// Sampling temperature for evaluation calls. Low, for consistent scoring.
pub const SCORING_TEMPERATURE: f64 = 0.3;

/// Token budget covering every rubric entry plus narrative feedback.
pub const SCORING_MAX_TOKENS: u32 = 2000;

/// Placeholder when the response omits per-rubric feedback.
pub const DEFAULT_FEEDBACK: &str = "No feedback provided";

/// Placeholder when the response omits overall feedback.
pub const DEFAULT_OVERALL_FEEDBACK: &str = "Good effort overall.";

// ---------------------------------------------------------------------------
// Raw response shape
// ---------------------------------------------------------------------------

/// The JSON shape the generation collaborator is instructed to return.
///
/// Feedback and evidence are optional and defaulted after mapping; the
/// numeric score is required; a missing or non-numeric score fails the
/// parse rather than being fabricated. Unknown fields (echoed rubric ids,
/// metric names) are ignored: position, not claimed identity, binds an
/// entry to its rubric.
#[derive(Debug, Deserialize)]
struct RawEvaluation {
    rubric_scores: Vec<RawRubricScore>,
    overall_feedback: Option<String>,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    areas_for_improvement: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawRubricScore {
    score: f64,
    feedback: Option<String>,
    #[serde(default)]
    evidence: Vec<String>,
}

// ---------------------------------------------------------------------------
// ConversationScorer
// ---------------------------------------------------------------------------

/// Scores finished training conversations against weighted rubrics.
///
/// Each call is a pure pipeline from (transcript, rubrics) to a result or
/// a typed failure: no shared mutable state, safe to run concurrently for
/// different sessions. Exactly one generation request is issued per call
/// and no retry is attempted here; the caller owns retry policy.
#[derive(Debug, Clone)]
pub struct ConversationScorer {
    llm: Arc<dyn LanguageModel>,
    params: GenerationParams,
}

impl ConversationScorer {
    /// Create a scorer with the default evaluation sampling parameters.
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self {
            llm,
            params: GenerationParams::new(SCORING_TEMPERATURE, SCORING_MAX_TOKENS),
        }
    }

    /// Create a scorer with custom sampling parameters.
    pub fn with_params(llm: Arc<dyn LanguageModel>, params: GenerationParams) -> Self {
        Self { llm, params }
    }

    /// Evaluate a conversation transcript against a set of rubrics.
    ///
    /// # Errors
    ///
    /// - [`ScoringError::InvalidInput`]: empty rubric list, unusable score
    ///   range, negative weight, or zero total weight. Rejected before any
    ///   external call.
    /// - [`ScoringError::Generation`]: the generation call failed.
    /// - [`ScoringError::MalformedResponse`]: the response was not the
    ///   expected JSON shape, or its `rubric_scores` count did not match
    ///   the rubric count.
    pub async fn score(
        &self,
        transcript: &[TranscriptEntry],
        rubrics: &[Rubric],
    ) -> Result<ScoringResult, ScoringError> {
        validate_rubrics(rubrics)?;

        let prompt = EvaluationPrompt::build(transcript, rubrics);
        log::debug!(
            "scoring conversation: model={}, turns={}, rubrics={}",
            self.llm.model(),
            transcript.len(),
            rubrics.len(),
        );

        let response = self.llm.generate(&prompt.messages(), &self.params).await?;
        let raw = parse_evaluation(&response)?;

        if raw.rubric_scores.len() != rubrics.len() {
            log::warn!(
                "rubric score count mismatch: expected {}, response carried {}",
                rubrics.len(),
                raw.rubric_scores.len(),
            );
            return Err(ScoringError::malformed(format!(
                "expected {} rubric scores, response carried {}",
                rubrics.len(),
                raw.rubric_scores.len(),
            )));
        }

        // Positional mapping: the Nth entry scores the Nth rubric. The
        // prompt enumerates rubrics in this same order.
        let rubric_scores: Vec<RubricScore> = raw
            .rubric_scores
            .into_iter()
            .zip(rubrics.iter())
            .map(|(reported, rubric)| {
                let clamped = reported.score.min(rubric.max_score).max(rubric.min_score);
                if clamped != reported.score {
                    log::debug!(
                        "clamped out-of-range score for '{}': {} -> {}",
                        rubric.metric_name,
                        reported.score,
                        clamped,
                    );
                }
                RubricScore {
                    rubric_id: rubric.id.clone(),
                    metric_name: rubric.metric_name.clone(),
                    score: clamped,
                    max_score: rubric.max_score,
                    weight: rubric.weight,
                    feedback: reported
                        .feedback
                        .unwrap_or_else(|| DEFAULT_FEEDBACK.to_string()),
                    evidence: reported.evidence,
                }
            })
            .collect();

        let total_score: f64 = rubric_scores
            .iter()
            .map(|s| (s.score / s.max_score) * s.weight)
            .sum();
        let max_total_score: f64 = rubrics.iter().map(|r| r.weight).sum();
        let percentage = round_to_tenth(total_score / max_total_score * 100.0);

        Ok(ScoringResult {
            rubric_scores,
            total_score,
            max_total_score,
            percentage,
            overall_feedback: raw
                .overall_feedback
                .unwrap_or_else(|| DEFAULT_OVERALL_FEEDBACK.to_string()),
            strengths: raw.strengths,
            areas_for_improvement: raw.areas_for_improvement,
        })
    }
}

/// Reject unusable rubric sets before any external call is made.
fn validate_rubrics(rubrics: &[Rubric]) -> Result<(), ScoringError> {
    if rubrics.is_empty() {
        return Err(ScoringError::invalid_input("no rubrics provided for scoring"));
    }

    for rubric in rubrics {
        if !rubric.has_valid_range() {
            return Err(ScoringError::invalid_input(format!(
                "rubric '{}' has an unusable score range ({} to {})",
                rubric.id, rubric.min_score, rubric.max_score,
            )));
        }
        if rubric.weight < 0.0 {
            return Err(ScoringError::invalid_input(format!(
                "rubric '{}' has a negative weight ({})",
                rubric.id, rubric.weight,
            )));
        }
    }

    let total_weight: f64 = rubrics.iter().map(|r| r.weight).sum();
    if total_weight <= 0.0 {
        return Err(ScoringError::invalid_input("total rubric weight is zero"));
    }

    Ok(())
}

/// Strict parse of the generation output into the raw evaluation shape.
fn parse_evaluation(response: &str) -> Result<RawEvaluation, ScoringError> {
    converter::parse_structured(response).map_err(|e| {
        log::warn!("failed to parse evaluation response: {}", e);
        ScoringError::malformed(e.to_string())
    })
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::llms::{ChatMessage, LlmError};
    use crate::scoring::PerformanceLevel;

    /// Deterministic stand-in for the generation collaborator.
    #[derive(Debug)]
    struct StubLlm {
        reply: String,
        calls: AtomicUsize,
    }

    impl StubLlm {
        fn new(reply: impl Into<String>) -> Self {
            Self {
                reply: reply.into(),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LanguageModel for StubLlm {
        fn model(&self) -> &str {
            "stub-model"
        }

        async fn generate(
            &self,
            _messages: &[ChatMessage],
            _params: &GenerationParams,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    /// Stand-in whose generation call always fails.
    #[derive(Debug)]
    struct FailingLlm;

    #[async_trait]
    impl LanguageModel for FailingLlm {
        fn model(&self) -> &str {
            "failing-model"
        }

        async fn generate(
            &self,
            _messages: &[ChatMessage],
            _params: &GenerationParams,
        ) -> Result<String, LlmError> {
            Err(LlmError::RateLimited)
        }
    }

    fn rubric(id: &str, name: &str, max_score: f64, weight: f64) -> Rubric {
        Rubric::new(id, "s1", name, format!("Measures {}", name), 0.0, max_score, weight)
    }

    fn transcript() -> Vec<TranscriptEntry> {
        vec![
            TranscriptEntry::persona("I want a refund, this is unacceptable."),
            TranscriptEntry::trainee("I understand your frustration. Let me fix this."),
        ]
    }

    fn evaluation_reply(scores: &[f64]) -> String {
        let entries: Vec<_> = scores
            .iter()
            .map(|s| {
                json!({
                    "score": s,
                    "feedback": "Solid handling.",
                    "evidence": ["I understand your frustration."]
                })
            })
            .collect();
        json!({
            "rubric_scores": entries,
            "overall_feedback": "Composed under pressure.",
            "strengths": ["Empathy", "Ownership"],
            "areas_for_improvement": ["Pacing"]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_empty_rubrics_rejected_without_call() {
        let llm = Arc::new(StubLlm::new(evaluation_reply(&[8.0])));
        let scorer = ConversationScorer::new(llm.clone());

        let result = scorer.score(&transcript(), &[]).await;
        assert!(matches!(result, Err(ScoringError::InvalidInput { .. })));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_zero_total_weight_rejected_without_call() {
        let llm = Arc::new(StubLlm::new(evaluation_reply(&[8.0])));
        let scorer = ConversationScorer::new(llm.clone());
        let rubrics = vec![
            rubric("r1", "Empathy", 10.0, 0.0),
            rubric("r2", "Clarity", 10.0, 0.0),
        ];

        let result = scorer.score(&transcript(), &rubrics).await;
        assert!(matches!(result, Err(ScoringError::InvalidInput { .. })));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_inverted_range_rejected_without_call() {
        let llm = Arc::new(StubLlm::new(evaluation_reply(&[8.0])));
        let scorer = ConversationScorer::new(llm.clone());
        let mut bad = rubric("r1", "Empathy", 10.0, 1.0);
        bad.min_score = 10.0;
        bad.max_score = 0.0;

        let result = scorer.score(&transcript(), &[bad]).await;
        assert!(matches!(result, Err(ScoringError::InvalidInput { .. })));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_propagates() {
        let scorer = ConversationScorer::new(Arc::new(FailingLlm));
        let rubrics = vec![rubric("r1", "Empathy", 10.0, 1.0)];

        let result = scorer.score(&transcript(), &rubrics).await;
        assert!(matches!(result, Err(ScoringError::Generation(_))));
    }

    #[tokio::test]
    async fn test_non_json_response_is_malformed() {
        let llm = Arc::new(StubLlm::new("I'd rate this conversation an 8 out of 10."));
        let scorer = ConversationScorer::new(llm);
        let rubrics = vec![rubric("r1", "Empathy", 10.0, 1.0)];

        let result = scorer.score(&transcript(), &rubrics).await;
        assert!(matches!(result, Err(ScoringError::MalformedResponse { .. })));
    }

    #[tokio::test]
    async fn test_missing_numeric_score_is_malformed() {
        let reply = json!({
            "rubric_scores": [{"feedback": "good", "evidence": []}],
            "overall_feedback": "ok"
        })
        .to_string();
        let scorer = ConversationScorer::new(Arc::new(StubLlm::new(reply)));
        let rubrics = vec![rubric("r1", "Empathy", 10.0, 1.0)];

        let result = scorer.score(&transcript(), &rubrics).await;
        assert!(matches!(result, Err(ScoringError::MalformedResponse { .. })));
    }

    #[tokio::test]
    async fn test_short_score_array_is_malformed() {
        let scorer = ConversationScorer::new(Arc::new(StubLlm::new(evaluation_reply(&[8.0]))));
        let rubrics = vec![
            rubric("r1", "Empathy", 10.0, 1.0),
            rubric("r2", "Clarity", 10.0, 1.0),
        ];

        let result = scorer.score(&transcript(), &rubrics).await;
        assert!(matches!(result, Err(ScoringError::MalformedResponse { .. })));
    }

    #[tokio::test]
    async fn test_long_score_array_is_malformed() {
        let scorer =
            ConversationScorer::new(Arc::new(StubLlm::new(evaluation_reply(&[8.0, 9.0]))));
        let rubrics = vec![rubric("r1", "Empathy", 10.0, 1.0)];

        let result = scorer.score(&transcript(), &rubrics).await;
        assert!(matches!(result, Err(ScoringError::MalformedResponse { .. })));
    }

    #[tokio::test]
    async fn test_weighted_aggregate() {
        let scorer =
            ConversationScorer::new(Arc::new(StubLlm::new(evaluation_reply(&[8.0, 9.0]))));
        let rubrics = vec![
            rubric("r1", "Empathy", 10.0, 1.0),
            rubric("r2", "Clarity", 10.0, 2.0),
        ];

        let result = scorer.score(&transcript(), &rubrics).await.unwrap();
        assert!((result.total_score - 2.6).abs() < 1e-9);
        assert_eq!(result.max_total_score, 3.0);
        assert_eq!(result.percentage, 86.7);
        assert_eq!(result.performance_level(), PerformanceLevel::Good);
    }

    #[tokio::test]
    async fn test_out_of_range_score_clamped() {
        let scorer = ConversationScorer::new(Arc::new(StubLlm::new(evaluation_reply(&[7.0]))));
        let rubrics = vec![rubric("r1", "Empathy", 5.0, 1.0)];

        let result = scorer.score(&transcript(), &rubrics).await.unwrap();
        assert_eq!(result.rubric_scores[0].score, 5.0);
        assert_eq!(result.total_score, 1.0);
        assert_eq!(result.max_total_score, 1.0);
        assert_eq!(result.percentage, 100.0);
        assert_eq!(result.performance_level(), PerformanceLevel::Excellent);
    }

    #[tokio::test]
    async fn test_undershoot_clamped_to_min() {
        let reply = evaluation_reply(&[-3.0]);
        let scorer = ConversationScorer::new(Arc::new(StubLlm::new(reply)));
        let mut r = rubric("r1", "Empathy", 10.0, 1.0);
        r.min_score = 2.0;

        let result = scorer.score(&transcript(), &[r]).await.unwrap();
        assert_eq!(result.rubric_scores[0].score, 2.0);
    }

    #[tokio::test]
    async fn test_fenced_json_accepted() {
        let fenced = format!("```json\n{}\n```", evaluation_reply(&[8.0]));
        let scorer = ConversationScorer::new(Arc::new(StubLlm::new(fenced)));
        let rubrics = vec![rubric("r1", "Empathy", 10.0, 1.0)];

        let result = scorer.score(&transcript(), &rubrics).await.unwrap();
        assert_eq!(result.rubric_scores[0].score, 8.0);
    }

    #[tokio::test]
    async fn test_missing_optional_fields_defaulted() {
        let reply = json!({
            "rubric_scores": [{"score": 6.0}]
        })
        .to_string();
        let scorer = ConversationScorer::new(Arc::new(StubLlm::new(reply)));
        let rubrics = vec![rubric("r1", "Empathy", 10.0, 1.0)];

        let result = scorer.score(&transcript(), &rubrics).await.unwrap();
        assert_eq!(result.rubric_scores[0].feedback, DEFAULT_FEEDBACK);
        assert!(result.rubric_scores[0].evidence.is_empty());
        assert_eq!(result.overall_feedback, DEFAULT_OVERALL_FEEDBACK);
        assert!(result.strengths.is_empty());
        assert!(result.areas_for_improvement.is_empty());
    }

    #[tokio::test]
    async fn test_result_order_matches_input_order() {
        // The response echoes misleading rubric ids; position binds the
        // entries, so the result order must still match the input order.
        let reply = json!({
            "rubric_scores": [
                {"rubric_id": "r2", "score": 3.0, "feedback": "first entry"},
                {"rubric_id": "r1", "score": 9.0, "feedback": "second entry"}
            ],
            "overall_feedback": "ok"
        })
        .to_string();
        let scorer = ConversationScorer::new(Arc::new(StubLlm::new(reply)));
        let rubrics = vec![
            rubric("r1", "Empathy", 10.0, 1.0),
            rubric("r2", "Clarity", 10.0, 1.0),
        ];

        let result = scorer.score(&transcript(), &rubrics).await.unwrap();
        assert_eq!(result.rubric_scores[0].rubric_id, "r1");
        assert_eq!(result.rubric_scores[0].metric_name, "Empathy");
        assert_eq!(result.rubric_scores[0].score, 3.0);
        assert_eq!(result.rubric_scores[1].rubric_id, "r2");
        assert_eq!(result.rubric_scores[1].score, 9.0);
    }

    #[tokio::test]
    async fn test_percentage_bounded_for_clamped_scores() {
        for reported in [-50.0, 0.0, 3.0, 10.0, 50.0] {
            let scorer =
                ConversationScorer::new(Arc::new(StubLlm::new(evaluation_reply(&[reported]))));
            let rubrics = vec![rubric("r1", "Empathy", 10.0, 2.0)];
            let result = scorer.score(&transcript(), &rubrics).await.unwrap();
            assert!(
                (0.0..=100.0).contains(&result.percentage),
                "percentage {} out of bounds for reported score {}",
                result.percentage,
                reported,
            );
        }
    }

    #[tokio::test]
    async fn test_exactly_one_generation_call() {
        let llm = Arc::new(StubLlm::new(evaluation_reply(&[8.0])));
        let scorer = ConversationScorer::new(llm.clone());
        let rubrics = vec![rubric("r1", "Empathy", 10.0, 1.0)];

        scorer.score(&transcript(), &rubrics).await.unwrap();
        assert_eq!(llm.call_count(), 1);
    }

    #[test]
    fn test_cloned_scorers_score_independently() {
        let scorer = ConversationScorer::new(Arc::new(StubLlm::new(evaluation_reply(&[8.0]))));
        let clone = scorer.clone();
        let rubrics = vec![rubric("r1", "Empathy", 10.0, 1.0)];

        let first = tokio_test::block_on(scorer.score(&transcript(), &rubrics)).unwrap();
        let second = tokio_test::block_on(clone.score(&transcript(), &rubrics)).unwrap();
        assert_eq!(first.percentage, second.percentage);
    }
}
