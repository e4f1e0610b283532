//! Improvement Result - Output structure of one optimizer run.
//!
//! Bundles the rewritten prompt with everything learned on the way: intent,
//! CLEAR scores before and after, triage and the per-pattern outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::context::Mode;
use super::intent::IntentResult;
use super::quality::{QualityScore, QualityScorer};
use super::triage::TriageResult;
use crate::patterns::{Improvement, ImprovementDimension};

/// Dimensions at or above this score are reported as strengths
pub const STRENGTH_THRESHOLD: u8 = 75;

/// A pattern that changed the prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedPattern {
    pub id: String,
    pub name: String,
    pub improvement: Improvement,
}

/// What the run found, grouped for display
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// Dimensions that already scored well before any rewrite
    pub strengths: Vec<String>,
    /// Missing information, from completeness and explicitness improvements
    pub gaps: Vec<String>,
    /// From clarity improvements
    pub ambiguities: Vec<String>,
    /// One entry per applied pattern
    pub suggestions: Vec<String>,
}

impl Analysis {
    /// Build the buckets from the pre-pipeline score and the applied patterns
    pub fn from_run(quality: &QualityScore, applied: &[AppliedPattern]) -> Self {
        let mut analysis = Self {
            strengths: quality
                .dimensions()
                .into_iter()
                .filter(|(_, score)| *score >= STRENGTH_THRESHOLD)
                .map(|(dimension, score)| format!("Strong {} ({}/100)", dimension, score))
                .collect(),
            ..Self::default()
        };

        for pattern in applied {
            let description = &pattern.improvement.description;
            match pattern.improvement.dimension {
                ImprovementDimension::Completeness | ImprovementDimension::Explicitness => {
                    analysis.gaps.push(description.clone());
                }
                ImprovementDimension::Clarity => analysis.ambiguities.push(description.clone()),
                _ => {}
            }
            analysis
                .suggestions
                .push(format!("{}: {}", pattern.name, description));
        }

        analysis
    }
}

/// Follow-up advice for the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Mode worth re-running in, `None` when the current run is enough
    pub suggested_mode: Option<Mode>,
    pub message: String,
}

impl Recommendation {
    /// Recommend deep mode when a fast run was triaged as needing it
    pub fn for_run(mode: Mode, triage: &TriageResult) -> Self {
        if mode == Mode::Fast && triage.needs_deep_analysis {
            Self {
                suggested_mode: Some(Mode::Deep),
                message: format!(
                    "Re-run in deep mode: {}",
                    triage.reasons.join("; ")
                ),
            }
        } else {
            Self {
                suggested_mode: None,
                message: "No further analysis needed".to_string(),
            }
        }
    }
}

/// Complete result of one `improve` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementResult {
    /// Prompt as supplied
    pub original: String,

    /// Prompt after the whole pipeline
    pub improved: String,

    pub mode: Mode,

    /// Detected (or supplied) intent
    pub intent: IntentResult,

    /// CLEAR scores of the original prompt
    pub quality: QualityScore,

    /// CLEAR scores of the improved prompt
    pub improved_quality: QualityScore,

    /// Overall score change, positive when the rewrite scored better
    pub quality_delta: i16,

    pub analysis: Analysis,

    pub triage: TriageResult,

    /// Full CLEAR breakdown, deep mode only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear_scores: Option<QualityScore>,

    /// Patterns that changed the prompt, in execution order
    pub patterns_applied: Vec<AppliedPattern>,

    /// Ids of patterns that errored or panicked
    pub patterns_failed: Vec<String>,

    pub recommendation: Recommendation,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,

    /// Timestamp of analysis
    pub analyzed_at: DateTime<Utc>,
}

impl ImprovementResult {
    /// Result that leaves the prompt untouched; the optimizer fills it in
    pub fn new(original: impl Into<String>, mode: Mode, intent: IntentResult, quality: QualityScore) -> Self {
        let original = original.into();
        Self {
            improved: original.clone(),
            original,
            mode,
            intent,
            quality,
            improved_quality: quality,
            quality_delta: 0,
            analysis: Analysis::default(),
            triage: TriageResult::default(),
            clear_scores: None,
            patterns_applied: vec![],
            patterns_failed: vec![],
            recommendation: Recommendation::for_run(mode, &TriageResult::default()),
            processing_time_ms: 0,
            analyzed_at: Utc::now(),
        }
    }

    /// Record the improved prompt and its score
    pub fn set_improved(&mut self, improved: String, improved_quality: QualityScore) {
        self.quality_delta = QualityScorer::score_delta(&self.quality, &improved_quality);
        self.improved = improved;
        self.improved_quality = improved_quality;
    }

    /// Whether any pattern changed the prompt
    pub fn is_changed(&self) -> bool {
        self.original != self.improved
    }

    /// Ids of the applied patterns, in execution order
    pub fn applied_ids(&self) -> Vec<&str> {
        self.patterns_applied.iter().map(|p| p.id.as_str()).collect()
    }

    /// Get a summary for logging
    pub fn summary(&self) -> String {
        format!(
            "Intent: {} ({}%), Mode: {}, Quality: {} -> {} ({:+}), Applied: {}, Failed: {}, Deep: {}, Time: {}ms",
            self.intent.primary_intent,
            self.intent.confidence,
            self.mode,
            self.quality.overall,
            self.improved_quality.overall,
            self.quality_delta,
            self.patterns_applied.len(),
            self.patterns_failed.len(),
            self.triage.needs_deep_analysis,
            self.processing_time_ms
        )
    }
}
