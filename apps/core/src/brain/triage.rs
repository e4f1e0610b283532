//! Triage Engine.
//!
//! Decides whether fast heuristics are enough for a prompt or whether deep
//! analysis should run. The decision is a disjunction of threshold checks over
//! the fast CLEAR scores plus a count of secondary indicators.

use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use super::context::Mode;
use super::quality::{QualityScore, QualityScorer};
use super::{signals, text};

/// Thresholds of the triage decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct TriageConfig {
    /// Conciseness strictly below this flags deep analysis
    #[validate(range(max = 100))]
    pub conciseness_threshold: u8,
    /// Logic strictly below this flags deep analysis
    #[validate(range(max = 100))]
    pub logic_threshold: u8,
    /// Explicitness strictly below this flags deep analysis
    #[validate(range(max = 100))]
    pub explicitness_threshold: u8,
    /// Prompts with fewer words count as a secondary indicator
    #[validate(range(min = 1, max = 200))]
    pub min_word_count: usize,
    /// Secondary indicators needed on their own to flag deep analysis
    #[validate(range(min = 1, max = 4))]
    pub secondary_indicator_threshold: usize,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            conciseness_threshold: 60,
            logic_threshold: 60,
            explicitness_threshold: 50,
            min_word_count: 8,
            secondary_indicator_threshold: 2,
        }
    }
}

/// Cheap structural facts about the prompt, independent of the CLEAR scores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriageSignals {
    pub word_count: usize,
    pub has_objective: bool,
    pub has_tech_stack: bool,
    pub has_output_format: bool,
}

impl TriageSignals {
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            word_count: text::word_count(prompt),
            has_objective: signals::has_objective(prompt),
            has_tech_stack: signals::has_tech_stack(prompt),
            has_output_format: signals::has_output_format(prompt),
        }
    }
}

/// Outcome of triage
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageResult {
    pub needs_deep_analysis: bool,
    /// One human-readable entry per triggered condition
    pub reasons: Vec<String>,
}

/// Triage engine
#[derive(Debug, Clone, Default)]
pub struct TriageEngine {
    scorer: QualityScorer,
    config: TriageConfig,
}

impl TriageEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TriageConfig) -> Self {
        Self {
            scorer: QualityScorer::new(),
            config,
        }
    }

    pub fn config(&self) -> &TriageConfig {
        &self.config
    }

    /// Score the prompt in fast mode and decide
    pub fn perform_triage(&self, prompt: &str) -> TriageResult {
        let scores = self.scorer.score(prompt, Mode::Fast);
        let signals = TriageSignals::from_prompt(prompt);
        self.evaluate(&scores, &signals)
    }

    /// Pure decision over precomputed scores and signals
    pub fn evaluate(&self, scores: &QualityScore, signals: &TriageSignals) -> TriageResult {
        let cfg = &self.config;
        let mut reasons = Vec::new();

        if scores.conciseness < cfg.conciseness_threshold {
            reasons.push(format!(
                "Conciseness score {} is below {}",
                scores.conciseness, cfg.conciseness_threshold
            ));
        }
        if scores.logic < cfg.logic_threshold {
            reasons.push(format!(
                "Logic score {} is below {}",
                scores.logic, cfg.logic_threshold
            ));
        }
        if scores.explicitness < cfg.explicitness_threshold {
            reasons.push(format!(
                "Explicitness score {} is below {}",
                scores.explicitness, cfg.explicitness_threshold
            ));
        }

        let mut indicators = Vec::new();
        if signals.word_count < cfg.min_word_count {
            indicators.push(format!("very short prompt ({} words)", signals.word_count));
        }
        if !signals.has_objective {
            indicators.push("no clear objective".to_string());
        }
        if !signals.has_tech_stack {
            indicators.push("no tech stack mentioned".to_string());
        }
        if !signals.has_output_format {
            indicators.push("no output format specified".to_string());
        }
        if indicators.len() >= cfg.secondary_indicator_threshold {
            reasons.push(format!(
                "{} missing critical elements: {}",
                indicators.len(),
                indicators.join(", ")
            ));
        }

        let needs_deep_analysis = !reasons.is_empty();
        debug!(needs_deep_analysis, reasons = reasons.len(), "triage evaluated");
        TriageResult {
            needs_deep_analysis,
            reasons,
        }
    }
}
