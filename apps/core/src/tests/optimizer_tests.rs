//! Optimizer Tests
//!
//! End-to-end runs of `improve`: scenarios, determinism, configuration and
//! recovery from faulty patterns.

use crate::brain::{Intent, IntentResult, Mode, PatternContext, PromptOptimizer, QualityScorer};
use crate::error::PatternError;
use crate::patterns::{
    ImprovementDimension, LibraryConfig, Pattern, PatternLibrary, PatternMeta, PatternMode,
    PatternResult, PatternSettings,
};

static PANICKING: PatternMeta = PatternMeta {
    id: "panicking",
    name: "Panicking",
    description: "Panics on every call",
    applicable_intents: &Intent::ALL,
    mode: PatternMode::Both,
    priority: 10,
    run_after: &[],
    config_schema: &[],
};

static FAILING: PatternMeta = PatternMeta {
    id: "failing",
    name: "Failing",
    description: "Returns an error on every call",
    applicable_intents: &Intent::ALL,
    mode: PatternMode::Both,
    priority: 8,
    run_after: &[],
    config_schema: &[],
};

static SHOUTING: PatternMeta = PatternMeta {
    id: "shouting",
    name: "Shouting",
    description: "Uppercases the prompt",
    applicable_intents: &Intent::ALL,
    mode: PatternMode::Both,
    priority: 1,
    run_after: &[],
    config_schema: &[],
};

struct Panicking;

impl Pattern for Panicking {
    fn meta(&self) -> &'static PatternMeta {
        &PANICKING
    }

    fn apply(&self, _: &str, _: &PatternContext, _: &PatternSettings) -> Result<PatternResult, PatternError> {
        panic!("pattern exploded")
    }
}

struct Failing;

impl Pattern for Failing {
    fn meta(&self) -> &'static PatternMeta {
        &FAILING
    }

    fn apply(&self, _: &str, _: &PatternContext, _: &PatternSettings) -> Result<PatternResult, PatternError> {
        Err(PatternError::failed(FAILING.id, "cannot render"))
    }
}

fn with_faulty_patterns() -> PatternLibrary {
    let mut library = PatternLibrary::builtin();
    library.register(Box::new(Panicking)).expect("unique id");
    library.register(Box::new(Failing)).expect("unique id");
    library
}

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn test_concise_prompt_gets_an_objective() {
        let optimizer = PromptOptimizer::new();
        let result = optimizer.improve("Create a login page", Mode::Fast);

        let ids = result.applied_ids();
        assert!(ids.contains(&"objective-clarifier"), "applied: {:?}", ids);
        assert!(!ids.contains(&"conciseness-filter"), "already concise, nothing to filter");
        assert!(result.improved.starts_with("# Objective"), "improved:\n{}", result.improved);

        let pipeline: Vec<&str> = optimizer
            .library()
            .applicable_patterns(&result.original, &result.intent, &result.quality, Mode::Fast)
            .iter()
            .map(|p| p.id())
            .collect();
        assert_eq!(pipeline.first(), Some(&"conciseness-filter"), "the filter ran first and declined");
    }

    #[test]
    fn test_polite_prompt_is_filtered() {
        let optimizer = PromptOptimizer::new();
        let original = "Please could you maybe help me create a login page if possible";
        let result = optimizer.improve(original, Mode::Fast);

        let lower = result.improved.to_lowercase();
        for filler in ["please", "could you", "maybe", "if possible"] {
            assert!(!lower.contains(filler), "'{}' survived:\n{}", filler, result.improved);
        }
        assert!(result.applied_ids().contains(&"conciseness-filter"));

        let scorer = QualityScorer::new();
        assert!(
            scorer.conciseness(&result.improved) > scorer.conciseness(original),
            "conciseness {} should beat {}",
            scorer.conciseness(&result.improved),
            scorer.conciseness(original)
        );
    }

    #[test]
    fn test_dependencies_marker_short_circuits_the_dependency_pattern() {
        let optimizer = PromptOptimizer::new();
        let prompt = "Plan the checkout rewrite.\n\nDependencies:\n- API service";
        let result = optimizer.improve_with_intent(prompt, Mode::Deep, Intent::Planning);

        assert!(!result.applied_ids().contains(&"dependency-identifier"));
        assert_eq!(result.improved.matches("Dependencies").count(), 1);
    }

    #[test]
    fn test_deep_mode_adds_deep_sections() {
        let optimizer = PromptOptimizer::new();
        let result = optimizer.improve_with_intent("Create a login page", Mode::Deep, Intent::CodeGeneration);

        assert!(result.improved.contains("## Edge Cases"));
        assert!(result.improved.contains("## Assumptions"));
        assert!(result.clear_scores.is_some());
        assert!(!result.analysis.gaps.is_empty());
    }

    #[test]
    fn test_fenced_code_survives_the_pipeline() {
        let optimizer = PromptOptimizer::new();
        let block = "```\nconst msg = \"Please just wait\";\nfixIt(); // make it work, etc.\n```";
        let prompt = format!("Please just refactor this, make it better:\n{}", block);

        for mode in [Mode::Fast, Mode::Deep] {
            let result = optimizer.improve_with_intent(&prompt, mode, Intent::Refinement);
            assert!(result.improved.contains(block), "code changed in {}:\n{}", mode, result.improved);
            assert!(result.applied_ids().contains(&"conciseness-filter"));
            assert!(result.applied_ids().contains(&"actionability-enhancer"));
        }
    }

    #[test]
    fn test_loose_sentences_are_organized_after_appended_sections() {
        let optimizer = PromptOptimizer::new();
        let prompt = "Build a signup form. It must validate emails. Do not use jQuery. Our users are mostly on mobile.";
        let result = optimizer.improve_with_intent(prompt, Mode::Fast, Intent::CodeGeneration);

        let ids = result.applied_ids();
        assert!(ids.contains(&"structure-organizer"), "applied: {:?}", ids);
        assert!(ids.contains(&"technical-context-enricher"), "applied: {:?}", ids);

        let improved = &result.improved;
        let requirements = improved.find("## Requirements").expect("requirements section");
        let technical = improved.find("## Technical Context").expect("technical context section");
        assert!(improved.starts_with("# Objective"), "improved:\n{}", improved);
        assert!(requirements < technical, "improved:\n{}", improved);
        assert!(improved.contains("## Constraints\n\n- Do not use jQuery."));
    }

    #[test]
    fn test_fast_mode_never_runs_deep_patterns() {
        let optimizer = PromptOptimizer::new();
        let result = optimizer.improve("Write a PRD for a habit tracker", Mode::Fast);

        for applied in &result.patterns_applied {
            let pattern = optimizer.library().get(&applied.id).expect("registered pattern");
            assert_ne!(pattern.meta().mode, PatternMode::Deep, "{} is deep-only", applied.id);
        }
    }
}

#[cfg(test)]
mod determinism_tests {
    use super::*;

    #[test]
    fn test_identical_runs_identical_output() {
        let optimizer = PromptOptimizer::new();
        let prompts = [
            "Create a login page",
            "Refactor this module to make it better, etc.",
            "Write a PRD for a habit tracker with a paid subscription",
            "",
        ];

        for prompt in prompts {
            for mode in [Mode::Fast, Mode::Deep] {
                let a = optimizer.improve(prompt, mode);
                let b = optimizer.improve(prompt, mode);
                assert_eq!(a.improved, b.improved, "{:?} / {}", prompt, mode);
                assert_eq!(a.patterns_applied, b.patterns_applied);
                assert_eq!(a.analysis, b.analysis);
            }
        }
    }

    #[test]
    fn test_disabled_pattern_never_applies() {
        let mut library = PatternLibrary::builtin();
        library.apply_config(LibraryConfig {
            disabled: vec!["conciseness-filter".to_string()],
            ..LibraryConfig::default()
        });
        let optimizer = PromptOptimizer::with_library(library);

        let result = optimizer.improve("Please could you maybe help me create a login page if possible", Mode::Fast);
        assert!(!result.applied_ids().contains(&"conciseness-filter"));
        assert!(result.improved.to_lowercase().contains("please"));
    }

    #[test]
    fn test_custom_settings_reach_patterns() {
        let mut library = PatternLibrary::builtin();
        let config: LibraryConfig = serde_json::from_value(serde_json::json!({
            "customSettings": { "edge-case-identifier": { "maxEdgeCases": 1 } }
        }))
        .expect("config parses");
        library.apply_config(config);
        let optimizer = PromptOptimizer::with_library(library);

        let result = optimizer.improve_with_intent("Create a login page", Mode::Deep, Intent::CodeGeneration);
        let section = result
            .improved
            .split("## Edge Cases\n\n")
            .nth(1)
            .expect("edge case section");
        let items = section.lines().take_while(|l| l.starts_with("- ")).count();
        assert_eq!(items, 1, "section:\n{}", section);
    }
}

#[cfg(test)]
mod fault_tolerance_tests {
    use super::*;

    #[test]
    fn test_faulty_patterns_are_skipped() {
        let healthy = PromptOptimizer::new();
        let faulty = PromptOptimizer::with_library(with_faulty_patterns());

        for mode in [Mode::Fast, Mode::Deep] {
            let expected = healthy.improve("Create a login page", mode);
            let result = faulty.improve("Create a login page", mode);

            assert_eq!(result.improved, expected.improved, "faults must not change the output");
            assert_eq!(result.patterns_failed, vec!["panicking", "failing"]);
            assert_eq!(result.patterns_applied, expected.patterns_applied);
        }
    }

    #[test]
    fn test_last_good_prompt_is_kept_after_a_panic() {
        struct Shouting;

        impl Pattern for Shouting {
            fn meta(&self) -> &'static PatternMeta {
                &SHOUTING
            }

            fn apply(&self, prompt: &str, _: &PatternContext, _: &PatternSettings) -> Result<PatternResult, PatternError> {
                Ok(PatternResult::applied(
                    format!("LOUD {}", prompt.to_uppercase()),
                    ImprovementDimension::Clarity,
                    "shouted",
                    crate::patterns::Impact::High,
                ))
            }
        }

        let library = PatternLibrary::from_patterns(vec![
            Box::new(Shouting) as Box<dyn Pattern>,
            Box::new(Panicking),
        ])
        .expect("unique ids");
        let optimizer = PromptOptimizer::with_library(library);

        let result = optimizer.improve_with_intent("make it pop", Mode::Fast, Intent::Refinement);
        assert_eq!(result.improved, "LOUD MAKE IT POP");
        assert_eq!(result.applied_ids(), vec!["shouting"]);
        assert_eq!(result.patterns_failed, vec!["panicking"]);
        assert!(result.analysis.ambiguities.contains(&"shouted".to_string()));
    }

    #[test]
    fn test_supplied_intent_skips_classification() {
        let optimizer = PromptOptimizer::with_library(with_faulty_patterns());
        let result = optimizer.improve_with_intent("anything", Mode::Fast, Intent::Summarization);
        assert_eq!(result.intent, IntentResult::supplied(Intent::Summarization, "anything"));
    }
}
