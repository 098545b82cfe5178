use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::catalog::{ParameterCatalog, ParameterKey, ScoringPolicy};
use super::domain::{MetricRecord, TargetActual};
use super::storage::{from_storage, to_storage};

/// Three-tier performance rating derived from the monthly percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rating {
    Low,
    Medium,
    High,
}

const HIGH_THRESHOLD: f64 = 71.0;
const MEDIUM_THRESHOLD: f64 = 31.0;

impl Rating {
    /// Fixed business thresholds: HIGH at 71 and above, MEDIUM at 31 and
    /// above, LOW below that.
    pub fn from_percentage(percentage: f64) -> Rating {
        if percentage >= HIGH_THRESHOLD {
            Rating::High
        } else if percentage >= MEDIUM_THRESHOLD {
            Rating::Medium
        } else {
            Rating::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rating::Low => "LOW",
            Rating::Medium => "MEDIUM",
            Rating::High => "HIGH",
        }
    }
}

/// Points earned by one target/actual pair under the given policy and weight.
///
/// Total over all finite non-negative inputs; the validation guard rejects
/// anything else before this runs. A perfectly met target always earns full
/// weight, whatever the policy says about the general case.
pub fn score_parameter(target: f64, actual: f64, weight: f64, policy: ScoringPolicy) -> f64 {
    if target == actual {
        return weight;
    }

    match policy {
        ScoringPolicy::Binary => {
            if actual == 0.0 {
                weight
            } else {
                0.0
            }
        }
        ScoringPolicy::InvertedRatio => {
            if target == 0.0 {
                0.0
            } else if actual <= target {
                weight
            } else {
                (target / actual * weight).max(0.0)
            }
        }
        ScoringPolicy::Ratio => {
            if target == 0.0 {
                0.0
            } else {
                (actual / target * weight).min(weight)
            }
        }
    }
}

/// Per-parameter outcome of one scoring pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredParameter {
    pub key: ParameterKey,
    pub target: f64,
    pub actual: f64,
    /// Points in natural units, `0..=weight`.
    pub points: f64,
    /// The same points on the legacy 0-10 storage scale.
    pub stored_score: f64,
}

/// Aggregate outcome of one scoring pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub total_score: f64,
    /// Numerically identical to `total_score` on the 100-point scale; both
    /// fields are kept because downstream consumers read both.
    pub percentage: f64,
    pub rating: Rating,
}

impl ScoreSummary {
    fn from_total(total_score: f64) -> Self {
        Self {
            total_score,
            percentage: total_score,
            rating: Rating::from_percentage(total_score),
        }
    }
}

/// Full result of scoring one submission: the per-parameter breakdown plus
/// the weighted aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredMetrics {
    pub parameters: Vec<ScoredParameter>,
    pub summary: ScoreSummary,
}

/// Stateless scorer applying an injected parameter catalog.
///
/// Pure computation over in-memory values: no I/O, no locks, safe to share
/// across request handlers.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    catalog: ParameterCatalog,
}

impl ScoringEngine {
    pub fn new(catalog: ParameterCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ParameterCatalog {
        &self.catalog
    }

    /// Score every catalog parameter present in the submission. Parameters
    /// absent from the map earn no points and produce no breakdown entry.
    pub fn score(&self, parameters: &BTreeMap<ParameterKey, TargetActual>) -> ScoredMetrics {
        let mut scored = Vec::with_capacity(parameters.len());
        let mut total = 0.0;

        for definition in self.catalog.iter() {
            let Some(pair) = parameters.get(&definition.key) else {
                continue;
            };

            let raw =
                score_parameter(pair.target, pair.actual, definition.weight, definition.policy);
            // Normalize through the storage scale so the aggregate computed
            // now and the one re-derived from the persisted record come from
            // identical values.
            let stored_score = to_storage(raw, definition.weight);
            let points = from_storage(stored_score, definition.weight);
            total += points;

            scored.push(ScoredParameter {
                key: definition.key,
                target: pair.target,
                actual: pair.actual,
                points,
                stored_score,
            });
        }

        ScoredMetrics {
            parameters: scored,
            summary: ScoreSummary::from_total(total),
        }
    }

    /// Re-derive the aggregate from a persisted record's stored scores. The
    /// storage scale round-trips exactly, so this matches the summary
    /// computed at submission time.
    pub fn summarize_record(&self, record: &MetricRecord) -> ScoreSummary {
        let mut total = 0.0;

        for definition in self.catalog.iter() {
            if let Some(entry) = record.parameters.get(&definition.key) {
                total += from_storage(entry.stored_score, definition.weight);
            }
        }

        ScoreSummary::from_total(total)
    }
}
