//! Prompt Optimizer - Main orchestrator of the pipeline.
//!
//! Classifies the intent, scores the prompt, runs triage, then folds the prompt
//! through every selected pattern in order. A pattern that errors or panics is
//! recorded as failed and skipped; the run continues with the last good prompt.

use chrono::Utc;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::context::{Mode, PatternContext};
use super::intent::{Intent, IntentClassifier, IntentResult};
use super::quality::QualityScorer;
use super::report::{AppliedPattern, Analysis, ImprovementResult, Recommendation};
use super::triage::{TriageConfig, TriageEngine};
use crate::patterns::{Pattern, PatternLibrary, PatternResult, PatternSettings};

/// Outcome of one guarded pattern invocation
enum Step {
    Ran(PatternResult),
    Failed(String),
}

/// Main optimizer that orchestrates all pipeline components
pub struct PromptOptimizer {
    classifier: IntentClassifier,
    scorer: QualityScorer,
    triage: TriageEngine,
    library: PatternLibrary,
}

impl Default for PromptOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptOptimizer {
    /// Create an optimizer with the built-in pattern catalogue
    pub fn new() -> Self {
        Self::with_library(PatternLibrary::builtin())
    }

    /// Create an optimizer over an explicit pattern library
    pub fn with_library(library: PatternLibrary) -> Self {
        Self {
            classifier: IntentClassifier::new(),
            scorer: QualityScorer::new(),
            triage: TriageEngine::new(),
            library,
        }
    }

    pub fn with_triage_config(mut self, config: TriageConfig) -> Self {
        self.triage = TriageEngine::with_config(config);
        self
    }

    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    pub fn triage_engine(&self) -> &TriageEngine {
        &self.triage
    }

    /// Improve a prompt, classifying its intent first
    #[instrument(skip(self, prompt), fields(len = prompt.len()))]
    pub fn improve(&self, prompt: &str, mode: Mode) -> ImprovementResult {
        let intent = self.classifier.classify(prompt);
        self.run(prompt, mode, intent)
    }

    /// Improve a prompt whose intent the caller already knows
    #[instrument(skip(self, prompt), fields(len = prompt.len()))]
    pub fn improve_with_intent(&self, prompt: &str, mode: Mode, intent: Intent) -> ImprovementResult {
        self.run(prompt, mode, IntentResult::supplied(intent, prompt))
    }

    fn run(&self, prompt: &str, mode: Mode, intent: IntentResult) -> ImprovementResult {
        let start = Instant::now();

        // 1. Score the original prompt
        let quality = self.scorer.score(prompt, mode);
        let mut result = ImprovementResult::new(prompt, mode, intent, quality);

        // 2. Triage (always a fast-mode pass)
        result.triage = self.triage.perform_triage(prompt);

        // 3. Select the ordered pipeline
        let pipeline = self
            .library
            .applicable_patterns(prompt, &result.intent, &quality, mode);

        // 4. Fold the prompt through every pattern
        let ctx = PatternContext::new(mode, prompt, result.intent.clone());
        let default_settings = PatternSettings::default();
        let mut current = prompt.to_string();

        for pattern in pipeline {
            let settings = self
                .library
                .pattern_settings(pattern.id())
                .unwrap_or(&default_settings);

            match Self::run_pattern(pattern, &current, &ctx, settings) {
                Step::Ran(outcome) if outcome.applied => {
                    debug!(
                        pattern = pattern.id(),
                        impact = ?outcome.improvement.impact,
                        "{}",
                        outcome.improvement.description
                    );
                    current = outcome.enhanced_prompt;
                    result.patterns_applied.push(AppliedPattern {
                        id: pattern.id().to_string(),
                        name: pattern.meta().name.to_string(),
                        improvement: outcome.improvement,
                    });
                }
                Step::Ran(outcome) => {
                    debug!(pattern = pattern.id(), "Skipped: {}", outcome.improvement.description);
                }
                Step::Failed(reason) => {
                    warn!(pattern = pattern.id(), "Pattern failed, continuing without it: {}", reason);
                    result.patterns_failed.push(pattern.id().to_string());
                }
            }
        }

        // 5. Score the improved prompt
        let improved_quality = self.scorer.score(&current, mode);
        result.set_improved(current, improved_quality);

        // 6. Analysis and recommendation
        result.analysis = Analysis::from_run(&quality, &result.patterns_applied);
        result.recommendation = Recommendation::for_run(mode, &result.triage);
        if mode == Mode::Deep {
            result.clear_scores = Some(quality);
        }

        // 7. Set timing
        result.processing_time_ms = start.elapsed().as_millis() as u64;
        result.analyzed_at = Utc::now();

        info!("{}", result.summary());
        result
    }

    /// Invoke one pattern, turning both errors and panics into `Step::Failed`
    fn run_pattern(
        pattern: &dyn Pattern,
        prompt: &str,
        ctx: &PatternContext,
        settings: &PatternSettings,
    ) -> Step {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| pattern.apply(prompt, ctx, settings)));
        match outcome {
            Ok(Ok(result)) => Step::Ran(result),
            Ok(Err(e)) => Step::Failed(e.to_string()),
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                Step::Failed(format!("panicked: {}", message))
            }
        }
    }
}
