//! Flags the key elements a request is missing.

use super::{Impact, ImprovementDimension, Pattern, PatternMeta, PatternMode, PatternResult, PatternSettings, SettingSpec};
use crate::brain::context::PatternContext;
use crate::brain::intent::Intent;
use crate::brain::quality::SUCCESS_MARKERS;
use crate::brain::{signals, text};
use crate::error::PatternError;

static META: PatternMeta = PatternMeta {
    id: "completeness-validator",
    name: "Completeness Validator",
    description: "Lists missing audience, constraints, success criteria and context",
    applicable_intents: &[
        Intent::CodeGeneration,
        Intent::Planning,
        Intent::Testing,
        Intent::PrdGeneration,
        Intent::Migration,
    ],
    mode: PatternMode::Both,
    priority: 6,
    run_after: &[],
    config_schema: &[SettingSpec {
        key: "maxGaps",
        description: "Maximum number of gaps listed",
        default: 5,
    }],
};

const HEADING: &str = "Context Needed";

const AUDIENCE_MARKERS: &[&str] = &[
    "user", "users", "customer", "customers", "audience", "admin", "admins", "visitor",
    "visitors", "team", "developers", "persona",
];

const CONSTRAINT_MARKERS: &[&str] = &[
    "constraint", "constraints", "must not", "limit", "performance", "within", "compatible",
    "deadline", "budget", "only", "without",
];

const EXISTING_CONTEXT_MARKERS: &[&str] = &[
    "existing", "current", "currently", "already", "codebase", "repo", "repository", "legacy",
    "from scratch", "new project",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct CompletenessValidator;

impl Pattern for CompletenessValidator {
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
            return Ok(PatternResult::unchanged(prompt, dimension, "Missing context already listed"));
        }

        let original = &ctx.original_prompt;
        let lower = original.to_lowercase();
        let checks: [(bool, &str); 5] = [
            (
                signals::has_objective(original),
                "Objective: what should exist or work when this is done",
            ),
            (
                text::contains_any(&lower, AUDIENCE_MARKERS),
                "Audience: who uses the result",
            ),
            (
                text::contains_any(&lower, CONSTRAINT_MARKERS),
                "Constraints: performance, compatibility or time limits",
            ),
            (
                text::contains_any(&lower, SUCCESS_MARKERS),
                "Success criteria: how the result is judged complete",
            ),
            (
                text::contains_any(&lower, EXISTING_CONTEXT_MARKERS),
                "Existing context: related code, data or earlier decisions",
            ),
        ];

        let gaps: Vec<String> = checks
            .iter()
            .filter(|(present, _)| !present)
            .map(|(_, gap)| gap.to_string())
            .collect();
        let gaps = text::cap(gaps, super::setting(&META, settings, "maxGaps"));
        if gaps.is_empty() {
            return Ok(PatternResult::unchanged(prompt, dimension, "All key elements present"));
        }

        let block = text::render_section(HEADING, &gaps);
        Ok(PatternResult::applied(
            text::append_block(prompt, &block),
            dimension,
            format!("Flagged {} missing element(s)", gaps.len()),
            Impact::from_count(gaps.len()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::context::Mode;
    use crate::brain::intent::IntentResult;

    fn run(prompt: &str) -> PatternResult {
        let ctx = PatternContext::new(Mode::Fast, prompt, IntentResult::supplied(Intent::CodeGeneration, prompt));
        CompletenessValidator.apply(prompt, &ctx, &PatternSettings::default()).unwrap()
    }

    #[test]
    fn test_bare_prompt_has_gaps() {
        let result = run("Create a login page");
        assert!(result.applied);
        assert!(!result.enhanced_prompt.contains("Objective:"));
        assert!(result.enhanced_prompt.contains("- Audience: who uses the result"));
        assert_eq!(result.improvement.impact, Impact::High);
    }

    #[test]
    fn test_complete_prompt_untouched() {
        let prompt = "Add a login page to our existing app for admin users. It must load within 200ms.";
        assert!(!run(prompt).applied);
    }

    #[test]
    fn test_second_pass_is_noop() {
        let first = run("Create a login page");
        let ctx = PatternContext::new(
            Mode::Fast,
            "Create a login page",
            IntentResult::supplied(Intent::CodeGeneration, "Create a login page"),
        );
        let second = CompletenessValidator
            .apply(&first.enhanced_prompt, &ctx, &PatternSettings::default())
            .unwrap();
        assert!(!second.applied);
    }
}
