//! Closes the prompt with a checklist to verify the result against.

use super::{Impact, ImprovementDimension, Pattern, PatternMeta, PatternMode, PatternResult, PatternSettings, SettingSpec};
use crate::brain::context::PatternContext;
use crate::brain::intent::{Intent, IntentTable};
use crate::brain::text;
use crate::error::PatternError;

static META: PatternMeta = PatternMeta {
    id: "validation-checklist-creator",
    name: "Validation Checklist Creator",
    description: "Adds a checklist that verifies the result, including earlier sections",
    applicable_intents: &[
        Intent::CodeGeneration,
        Intent::Testing,
        Intent::Migration,
        Intent::Refinement,
        Intent::Debugging,
        Intent::SecurityReview,
    ],
    mode: PatternMode::Deep,
    priority: 2,
    run_after: &["success-criteria-enforcer", "edge-case-identifier"],
    config_schema: &[SettingSpec {
        key: "maxItems",
        description: "Maximum number of checklist items",
        default: 8,
    }],
};

const HEADING: &str = "Validation Checklist";

/// Sections written by earlier patterns and the check each one implies
const SECTION_CHECKS: &[(&str, &str)] = &[
    ("success criteria", "Each success criterion above is met"),
    ("edge cases", "Each listed edge case is exercised"),
    ("error handling", "Every error path listed above is handled"),
    ("ambiguities to resolve", "Open questions are answered or assumptions recorded"),
];

const INTENT_CHECKS: IntentTable<&[&str]> = IntentTable {
    code_generation: &["Code compiles and passes the linter", "New code has tests"],
    planning: &[],
    refinement: &["Behaviour before and after is compared", "Benchmarks or metrics are recorded"],
    debugging: &["The root cause is identified, not only the symptom", "A regression test is added"],
    documentation: &[],
    testing: &["Tests fail when the behaviour under test is broken", "The suite runs in CI"],
    migration: &["Old and new versions agree on sample data", "Rollback is tested"],
    security_review: &["Findings are ranked by severity", "Each finding has a remediation"],
    learning: &[],
    summarization: &[],
    prd_generation: &[],
};

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationChecklistCreator;

impl Pattern for ValidationChecklistCreator {
    fn meta(&self) -> &'static PatternMeta {
        &META
    }

    fn apply(
        &self,
        prompt: &str,
        ctx: &PatternContext,
        settings: &PatternSettings,
    ) -> Result<PatternResult, PatternError> {
        let dimension = ImprovementDimension::Completeness;

        if text::has_section(prompt, HEADING) {
            return Ok(PatternResult::unchanged(prompt, dimension, "Validation checklist already present"));
        }

        // earlier sections live in the current prompt, not the original one
        let mut items = Vec::new();
        for (section, check) in SECTION_CHECKS {
            if text::has_section(prompt, section) {
                super::push_unique(&mut items, check);
            }
        }
        for check in INTENT_CHECKS.get(ctx.intent.primary_intent).iter() {
            super::push_unique(&mut items, check);
        }

        let items: Vec<String> = text::cap(items, super::setting(&META, settings, "maxItems"))
            .into_iter()
            .map(|item| format!("[ ] {}", item))
            .collect();
        if items.is_empty() {
            return Ok(PatternResult::unchanged(prompt, dimension, "Nothing to validate"));
        }

        let block = text::render_section(HEADING, &items);
        Ok(PatternResult::applied(
            text::append_block(prompt, &block),
            dimension,
            format!("Added a {}-item validation checklist", items.len()),
            Impact::from_count(items.len()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::context::Mode;
    use crate::brain::intent::IntentResult;

    fn run(prompt: &str, intent: Intent) -> PatternResult {
        let ctx = PatternContext::new(Mode::Deep, prompt, IntentResult::supplied(intent, prompt));
        ValidationChecklistCreator.apply(prompt, &ctx, &PatternSettings::default()).unwrap()
    }

    #[test]
    fn test_checks_reference_earlier_sections() {
        let prompt = "Fix the crash\n\n## Success Criteria\n\n- no crash\n\n## Edge Cases\n\n- empty file";
        let result = run(prompt, Intent::Debugging);
        assert!(result.applied);
        assert!(result.enhanced_prompt.ends_with(
            "## Validation Checklist\n\n- [ ] Each success criterion above is met\n\
             - [ ] Each listed edge case is exercised\n\
             - [ ] The root cause is identified, not only the symptom\n\
             - [ ] A regression test is added"
        ));
        assert_eq!(result.improvement.impact, Impact::High);
    }

    #[test]
    fn test_intent_checks_only() {
        let result = run("Port the service to Go", Intent::Migration);
        assert_eq!(result.enhanced_prompt.matches("- [ ] ").count(), 2);
        assert!(!run(&result.enhanced_prompt, Intent::Migration).applied);
    }
}
