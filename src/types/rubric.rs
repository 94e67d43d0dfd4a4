//! Rubric definitions for scenario evaluation.

use serde::{Deserialize, Serialize};

/// One evaluation metric attached to a training scenario.
///
/// Rubrics are authored by administrators in the content-management layer
/// and arrive here fully formed; they are immutable for the duration of a
/// scoring call. Bounds are inclusive, with `min_score < max_score`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rubric {
    /// Unique identifier of the rubric.
    pub id: String,
    /// Identifier of the scenario that owns this rubric.
    pub scenario_id: String,
    /// Human-readable label for the metric (e.g., "Active Listening").
    pub metric_name: String,
    /// Guidance text describing what the metric evaluates.
    pub description: String,
    /// Inclusive lower bound of the score range.
    pub min_score: f64,
    /// Inclusive upper bound of the score range.
    pub max_score: f64,
    /// Non-negative importance multiplier for aggregation.
    pub weight: f64,
}

impl Rubric {
    /// Create a new rubric.
    pub fn new(
        id: impl Into<String>,
        scenario_id: impl Into<String>,
        metric_name: impl Into<String>,
        description: impl Into<String>,
        min_score: f64,
        max_score: f64,
        weight: f64,
    ) -> Self {
        Self {
            id: id.into(),
            scenario_id: scenario_id.into(),
            metric_name: metric_name.into(),
            description: description.into(),
            min_score,
            max_score,
            weight,
        }
    }

    /// Whether the score range is well-formed for scoring.
    ///
    /// A rubric is scorable when `min_score < max_score` and the upper
    /// bound is positive (it is the denominator of the fractional score).
    pub fn has_valid_range(&self) -> bool {
        self.min_score < self.max_score && self.max_score > 0.0
    }
}
