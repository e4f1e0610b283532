//! Pattern Library Tests
//!
//! Selection, priority ordering, `run_after` ordering and configuration faults.

use crate::brain::{Intent, IntentResult, Mode, PatternContext, QualityScore};
use crate::error::PatternError;
use crate::patterns::{
    LibraryConfig, Pattern, PatternLibrary, PatternMeta, PatternMode, PatternResult,
    PatternSettings, ImprovementDimension,
};

fn intent(i: Intent) -> IntentResult {
    IntentResult::supplied(i, "")
}

fn pipeline_ids(library: &PatternLibrary, i: Intent, mode: Mode) -> Vec<&'static str> {
    library
        .applicable_patterns("", &intent(i), &QualityScore::zero(mode), mode)
        .iter()
        .map(|p| p.id())
        .collect()
}

/// Minimal pattern used to exercise ordering
struct Stub(&'static PatternMeta);

impl Pattern for Stub {
    fn meta(&self) -> &'static PatternMeta {
        self.0
    }

    fn apply(
        &self,
        prompt: &str,
        _ctx: &PatternContext,
        _settings: &PatternSettings,
    ) -> Result<PatternResult, PatternError> {
        Ok(PatternResult::unchanged(prompt, ImprovementDimension::Clarity, "stub"))
    }
}

const ALL_INTENTS: &[Intent] = &Intent::ALL;

const fn stub_meta(id: &'static str, priority: u8, run_after: &'static [&'static str]) -> PatternMeta {
    PatternMeta {
        id,
        name: id,
        description: "test stub",
        applicable_intents: ALL_INTENTS,
        mode: PatternMode::Both,
        priority,
        run_after,
        config_schema: &[],
    }
}

static CHAIN_A: PatternMeta = stub_meta("a", 9, &["b"]);
static CHAIN_B: PatternMeta = stub_meta("b", 6, &["c"]);
static CHAIN_C: PatternMeta = stub_meta("c", 3, &[]);
static FIRST: PatternMeta = stub_meta("first", 5, &[]);
static SECOND: PatternMeta = stub_meta("second", 5, &[]);
static EAGER: PatternMeta = stub_meta("eager", 10, &["late"]);
static LATE: PatternMeta = stub_meta("late", 1, &[]);

#[cfg(test)]
mod selection_tests {
    use super::*;

    #[test]
    fn test_pipeline_contains_exactly_the_applicable_patterns() {
        let library = PatternLibrary::builtin();

        for i in Intent::ALL {
            for mode in [Mode::Fast, Mode::Deep] {
                let ctx = PatternContext::new(mode, "", intent(i));
                let ids = pipeline_ids(&library, i, mode);
                for id in library.ids() {
                    let applicable = library.get(id).is_some_and(|p| p.is_applicable(&ctx));
                    assert_eq!(
                        ids.contains(&id),
                        applicable,
                        "{} selection mismatch for {} / {}",
                        id,
                        i,
                        mode
                    );
                }
            }
        }
    }

    #[test]
    fn test_disabling_conciseness_filter_everywhere() {
        let mut library = PatternLibrary::builtin();
        library.apply_config(LibraryConfig {
            disabled: vec!["conciseness-filter".to_string()],
            ..LibraryConfig::default()
        });

        for i in Intent::ALL {
            for mode in [Mode::Fast, Mode::Deep] {
                let ids = pipeline_ids(&library, i, mode);
                assert!(
                    !ids.contains(&"conciseness-filter"),
                    "conciseness-filter still selected for {} / {}",
                    i,
                    mode
                );
                assert!(!ids.is_empty(), "{} / {} lost its whole pipeline", i, mode);
            }
        }
    }

    #[test]
    fn test_config_value_variant_matches_instance_config() {
        let config = LibraryConfig {
            disabled: vec!["objective-clarifier".to_string()],
            ..LibraryConfig::default()
        };
        let plain = PatternLibrary::builtin();
        let mut configured = PatternLibrary::builtin();
        configured.apply_config(config.clone());

        let scores = QualityScore::zero(Mode::Deep);
        let with: Vec<&str> = plain
            .applicable_patterns_with("", &intent(Intent::Planning), &scores, Mode::Deep, &config)
            .iter()
            .map(|p| p.id())
            .collect();
        assert_eq!(with, pipeline_ids(&configured, Intent::Planning, Mode::Deep));
        assert!(pipeline_ids(&plain, Intent::Planning, Mode::Deep).contains(&"objective-clarifier"));
    }

    #[test]
    fn test_configuration_faults_are_ignored() {
        let mut library = PatternLibrary::builtin();
        let before = pipeline_ids(&library, Intent::CodeGeneration, Mode::Deep);

        let config: LibraryConfig = serde_json::from_value(serde_json::json!({
            "disabled": ["no-such-pattern"],
            "priorityOverrides": {
                "conciseness-filter": 0,
                "objective-clarifier": 42,
                "ghost": 5
            }
        }))
        .expect("config parses");
        library.apply_config(config);

        assert_eq!(pipeline_ids(&library, Intent::CodeGeneration, Mode::Deep), before);
    }
}

#[cfg(test)]
mod ordering_tests {
    use super::*;

    #[test]
    fn test_builtin_pipelines_follow_priority() {
        let library = PatternLibrary::builtin();

        for i in Intent::ALL {
            for mode in [Mode::Fast, Mode::Deep] {
                let scores = QualityScore::zero(mode);
                let pipeline = library.applicable_patterns("", &intent(i), &scores, mode);
                for pair in pipeline.windows(2) {
                    assert!(
                        pair[0].meta().priority >= pair[1].meta().priority,
                        "{} ({}) ran before {} ({}) for {} / {}",
                        pair[0].id(),
                        pair[0].meta().priority,
                        pair[1].id(),
                        pair[1].meta().priority,
                        i,
                        mode
                    );
                }
            }
        }
    }

    #[test]
    fn test_priority_override_reorders() {
        let mut library = PatternLibrary::builtin();
        let mut config = LibraryConfig::default();
        config.priority_overrides.insert("output-format-enforcer".to_string(), 10);
        library.apply_config(config);

        let ids = pipeline_ids(&library, Intent::CodeGeneration, Mode::Fast);
        let format = ids.iter().position(|id| *id == "output-format-enforcer");
        let objective = ids.iter().position(|id| *id == "objective-clarifier");
        assert!(format < objective, "override should lift output-format-enforcer: {:?}", ids);
    }

    #[test]
    fn test_equal_priorities_keep_registration_order() {
        let library = PatternLibrary::from_patterns(vec![
            Box::new(Stub(&FIRST)) as Box<dyn Pattern>,
            Box::new(Stub(&SECOND)),
        ])
        .expect("unique ids");
        assert_eq!(pipeline_ids(&library, Intent::Testing, Mode::Fast), vec!["first", "second"]);
    }

    #[test]
    fn test_run_after_wins_over_priority() {
        let library = PatternLibrary::from_patterns(vec![
            Box::new(Stub(&EAGER)) as Box<dyn Pattern>,
            Box::new(Stub(&LATE)),
        ])
        .expect("unique ids");
        assert_eq!(pipeline_ids(&library, Intent::Planning, Mode::Deep), vec!["late", "eager"]);
    }

    #[test]
    fn test_builtin_run_after_with_inverted_priorities() {
        let mut library = PatternLibrary::builtin();
        let mut config = LibraryConfig::default();
        config.priority_overrides.insert("structure-organizer".to_string(), 10);
        config.priority_overrides.insert("conciseness-filter".to_string(), 1);
        library.apply_config(config);

        let ids = pipeline_ids(&library, Intent::Refinement, Mode::Fast);
        let organizer = ids.iter().position(|id| *id == "structure-organizer");
        let filter = ids.iter().position(|id| *id == "conciseness-filter");
        assert!(filter < organizer, "structure-organizer must run after conciseness-filter: {:?}", ids);
    }

    #[test]
    fn test_multi_hop_chain_is_best_effort() {
        // a runs after b, b runs after c; one adjustment pass only fixes the
        // last edge it visits
        let library = PatternLibrary::from_patterns(vec![
            Box::new(Stub(&CHAIN_A)) as Box<dyn Pattern>,
            Box::new(Stub(&CHAIN_B)),
            Box::new(Stub(&CHAIN_C)),
        ])
        .expect("unique ids");

        let ids = pipeline_ids(&library, Intent::CodeGeneration, Mode::Fast);
        assert_eq!(ids, vec!["a", "c", "b"]);
    }
}
