//! Brain Module Tests
//!
//! Tests for intent classification, CLEAR scoring and the triage decision.

use crate::brain::{
    Intent, IntentClassifier, Mode, QualityScore, QualityScorer, Rating, TriageConfig,
    TriageEngine, TriageSignals,
};

#[cfg(test)]
mod intent_classifier_tests {
    use super::*;

    #[test]
    fn test_intent_per_prompt() {
        let classifier = IntentClassifier::new();

        let cases = vec![
            ("Create a login page", Intent::CodeGeneration),
            ("Create a roadmap with milestones for the mobile launch", Intent::Planning),
            ("Migrate our app from Vue 2 to Vue 3", Intent::Migration),
            ("Audit the authentication flow for XSS and CSRF vulnerabilities", Intent::SecurityReview),
            ("Write unit tests for the payment service with pytest", Intent::Testing),
            ("Explain the difference between threads and processes", Intent::Learning),
            ("Summarize the key points of this discussion", Intent::Summarization),
        ];

        for (prompt, expected) in cases {
            let result = classifier.classify(prompt);
            assert_eq!(
                result.primary_intent, expected,
                "Expected {} for '{}', got {} via {:?}",
                expected, prompt, result.primary_intent, result.matched_signals
            );
        }
    }

    #[test]
    fn test_confidence_is_bounded() {
        let classifier = IntentClassifier::new();

        let prompts = vec![
            "Fix the bug. The error is a panic in the stack trace. It crashes and fails.",
            "Write a PRD with user stories, personas, acceptance criteria and success metrics",
            "hello",
            "",
        ];

        for prompt in prompts {
            let result = classifier.classify(prompt);
            assert!(result.confidence <= 100, "confidence out of range for '{}'", prompt);
        }
    }

    #[test]
    fn test_no_signal_defaults_to_code_generation() {
        let classifier = IntentClassifier::new();
        let result = classifier.classify("purple elephants dance quietly");
        assert_eq!(result.primary_intent, Intent::CodeGeneration);
        assert_eq!(result.confidence, 0);
    }
}

#[cfg(test)]
mod quality_scorer_tests {
    use super::*;

    fn inputs() -> Vec<String> {
        vec![
            String::new(),
            "   \n\t ".to_string(),
            "?!.,;".to_string(),
            "Create a login page".to_string(),
            "please please please could you maybe just basically help me if possible thanks".to_string(),
            "Make it simple. Make it comprehensive. Quick. Thorough. Minimal. Full-featured.".to_string(),
            "You are a senior engineer. Return JSON in a formal tone. Success criteria: tests pass. For example: {}."
                .to_string(),
            "word ".repeat(500),
            "```rust\nfn main() {}\n```\nÉcris une fonction — 日本語のテキスト".to_string(),
        ]
    }

    fn assert_bounded(score: &QualityScore, prompt: &str) {
        for (dimension, value) in score.dimensions() {
            assert!(value <= 100, "{} = {} for {:?}", dimension, value, prompt);
        }
        assert!(score.overall <= 100, "overall = {} for {:?}", score.overall, prompt);
    }

    #[test]
    fn test_scores_bounded_for_all_inputs() {
        let scorer = QualityScorer::new();
        for prompt in inputs() {
            for mode in [Mode::Fast, Mode::Deep] {
                let score = scorer.score(&prompt, mode);
                assert_bounded(&score, &prompt);
                assert_eq!(
                    score.adaptiveness.is_some(),
                    mode == Mode::Deep,
                    "adaptiveness only in deep mode"
                );
            }
        }
    }

    #[test]
    fn test_empty_prompt_scores_zero() {
        let scorer = QualityScorer::new();
        for mode in [Mode::Fast, Mode::Deep] {
            let score = scorer.score("", mode);
            assert_eq!(score, QualityScore::zero(mode));
            assert_eq!(score.rating, Rating::Poor);
        }
    }

    #[test]
    fn test_filler_lowers_conciseness() {
        let scorer = QualityScorer::new();
        let polite = scorer.conciseness("Please could you maybe help me create a login page if possible");
        let direct = scorer.conciseness("Create a login page");
        assert!(polite < direct, "polite {} should score below direct {}", polite, direct);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let scorer = QualityScorer::new();
        for prompt in inputs() {
            assert_eq!(scorer.score(&prompt, Mode::Deep), scorer.score(&prompt, Mode::Deep));
        }
    }
}

#[cfg(test)]
mod triage_tests {
    use super::*;

    fn scores(c: u8, l: u8, e: u8) -> QualityScore {
        QualityScore {
            conciseness: c,
            logic: l,
            explicitness: e,
            adaptiveness: None,
            reflectiveness: None,
            overall: 0,
            rating: Rating::Poor,
        }
    }

    fn signal_variants() -> Vec<TriageSignals> {
        let mut variants = Vec::new();
        for word_count in [3, 40] {
            for mask in 0..8u8 {
                variants.push(TriageSignals {
                    word_count,
                    has_objective: mask & 1 != 0,
                    has_tech_stack: mask & 2 != 0,
                    has_output_format: mask & 4 != 0,
                });
            }
        }
        variants
    }

    #[test]
    fn test_lowering_a_dimension_never_clears_deep_analysis() {
        let engine = TriageEngine::new();
        let grid: Vec<u8> = (0..=100).step_by(20).collect();

        for signals in signal_variants() {
            for &c in &grid {
                for &l in &grid {
                    for &e in &grid {
                        if !engine.evaluate(&scores(c, l, e), &signals).needs_deep_analysis {
                            continue;
                        }
                        for lower in (0..c).step_by(9) {
                            assert!(engine.evaluate(&scores(lower, l, e), &signals).needs_deep_analysis);
                        }
                        for lower in (0..l).step_by(9) {
                            assert!(engine.evaluate(&scores(c, lower, e), &signals).needs_deep_analysis);
                        }
                        for lower in (0..e).step_by(9) {
                            assert!(engine.evaluate(&scores(c, l, lower), &signals).needs_deep_analysis);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_reasons_empty_iff_not_deep() {
        let engine = TriageEngine::new();
        for signals in signal_variants() {
            for (c, l, e) in [(90, 90, 90), (10, 90, 90), (90, 10, 90), (90, 90, 10), (0, 0, 0)] {
                let result = engine.evaluate(&scores(c, l, e), &signals);
                assert_eq!(result.needs_deep_analysis, !result.reasons.is_empty());
            }
        }
    }

    #[test]
    fn test_short_vague_prompt_is_escalated() {
        let result = TriageEngine::new().perform_triage("make it nice");
        assert!(result.needs_deep_analysis);
        assert!(
            result.reasons.iter().any(|r| r.contains("missing critical elements")),
            "reasons: {:?}",
            result.reasons
        );
    }

    #[test]
    fn test_custom_thresholds() {
        let strict = TriageEngine::with_config(TriageConfig {
            conciseness_threshold: 100,
            ..TriageConfig::default()
        });
        let signals = TriageSignals {
            word_count: 40,
            has_objective: true,
            has_tech_stack: true,
            has_output_format: true,
        };
        assert!(strict.evaluate(&scores(99, 90, 90), &signals).needs_deep_analysis);
        assert!(!TriageEngine::new().evaluate(&scores(99, 90, 90), &signals).needs_deep_analysis);
    }
}
