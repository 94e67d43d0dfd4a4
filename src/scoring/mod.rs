//! Conversation scoring against weighted rubrics.
//!
//! Two collaborating pieces:
//! - [`prompt::EvaluationPrompt`] renders a deterministic evaluation
//!   request from a transcript and a rubric set.
//! - [`evaluator::ConversationScorer`] sends that request to a
//!   [`crate::llms::LanguageModel`], validates the free-text response, and
//!   computes the weighted aggregate.
//!
//! Scores are clamped into each rubric's range, aggregated as weighted
//! fractions, and classified into one of five performance bands.

pub mod evaluator;
pub mod prompt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Score value objects
// ---------------------------------------------------------------------------

/// The evaluated score for a single rubric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RubricScore {
    /// ID of the originating rubric.
    pub rubric_id: String,
    /// Metric label, carried through for display.
    pub metric_name: String,
    /// Score clamped into `[min_score, max_score]`.
    pub score: f64,
    /// The rubric's upper bound, carried through for display/aggregation.
    pub max_score: f64,
    /// The rubric's weight, carried through for display/aggregation.
    pub weight: f64,
    /// Free-text feedback for this metric.
    pub feedback: String,
    /// Verbatim quotes from the conversation supporting the score.
    pub evidence: Vec<String>,
}

/// The aggregate outcome of scoring one conversation.
///
/// `rubric_scores` order matches the input rubric order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringResult {
    /// Per-rubric scores, in input rubric order.
    pub rubric_scores: Vec<RubricScore>,
    /// Sum of each rubric's weighted fractional score.
    pub total_score: f64,
    /// Sum of all rubric weights.
    pub max_total_score: f64,
    /// `total_score / max_total_score * 100`, rounded to one decimal.
    pub percentage: f64,
    /// Narrative feedback on the whole conversation.
    pub overall_feedback: String,
    /// Key strengths demonstrated.
    pub strengths: Vec<String>,
    /// Areas where the trainee should improve.
    pub areas_for_improvement: Vec<String>,
}

impl ScoringResult {
    /// Classify this result into a performance band.
    pub fn performance_level(&self) -> PerformanceLevel {
        PerformanceLevel::from_percentage(self.percentage)
    }
}

impl std::fmt::Display for ScoringResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Performance: {} ({:.1}%)",
            self.performance_level().label(),
            self.percentage
        )?;
        writeln!(
            f,
            "Weighted score: {:.2}/{:.2}",
            self.total_score, self.max_total_score
        )?;

        for score in &self.rubric_scores {
            writeln!(f)?;
            writeln!(
                f,
                "- {}: {:.1}/{:.1} (weight {})",
                score.metric_name, score.score, score.max_score, score.weight
            )?;
            if !score.feedback.is_empty() {
                writeln!(f, "  {}", score.feedback)?;
            }
        }

        if !self.overall_feedback.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", self.overall_feedback)?;
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Performance bands
// ---------------------------------------------------------------------------

/// Display classification of a percentage score.
///
/// Bands have inclusive lower bounds evaluated top-down, so boundary values
/// belong to the higher band. Used only for presentation; aggregation never
/// reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PerformanceLevel {
    Excellent,
    Good,
    Satisfactory,
    NeedsImprovement,
    Unsatisfactory,
}

impl PerformanceLevel {
    /// Classify a percentage into its band.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            PerformanceLevel::Excellent
        } else if percentage >= 75.0 {
            PerformanceLevel::Good
        } else if percentage >= 60.0 {
            PerformanceLevel::Satisfactory
        } else if percentage >= 40.0 {
            PerformanceLevel::NeedsImprovement
        } else {
            PerformanceLevel::Unsatisfactory
        }
    }

    /// Human-readable band label.
    pub fn label(&self) -> &'static str {
        match self {
            PerformanceLevel::Excellent => "Excellent",
            PerformanceLevel::Good => "Good",
            PerformanceLevel::Satisfactory => "Satisfactory",
            PerformanceLevel::NeedsImprovement => "Needs Improvement",
            PerformanceLevel::Unsatisfactory => "Unsatisfactory",
        }
    }

    /// Descriptive text shown alongside the label.
    pub fn description(&self) -> &'static str {
        match self {
            PerformanceLevel::Excellent => "Outstanding performance! You exceeded expectations.",
            PerformanceLevel::Good => "Good job! You demonstrated strong skills.",
            PerformanceLevel::Satisfactory => {
                "Satisfactory performance with room for improvement."
            }
            PerformanceLevel::NeedsImprovement => {
                "Additional practice recommended to improve skills."
            }
            PerformanceLevel::Unsatisfactory => {
                "Significant improvement needed. Consider reviewing training materials."
            }
        }
    }

    /// Display color (hex) for this band.
    pub fn color(&self) -> &'static str {
        match self {
            PerformanceLevel::Excellent => "#4caf50",
            PerformanceLevel::Good => "#8bc34a",
            PerformanceLevel::Satisfactory => "#ff9800",
            PerformanceLevel::NeedsImprovement => "#ff5722",
            PerformanceLevel::Unsatisfactory => "#f44336",
        }
    }
}

impl std::fmt::Display for PerformanceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
