//! Adds checkable success criteria when the request has none.

use super::{Impact, ImprovementDimension, Pattern, PatternMeta, PatternMode, PatternResult, PatternSettings, SettingSpec};
use crate::brain::context::PatternContext;
use crate::brain::intent::{Intent, IntentTable};
use crate::brain::text;
use crate::error::PatternError;

static META: PatternMeta = PatternMeta {
    id: "success-criteria-enforcer",
    name: "Success Criteria Enforcer",
    description: "Adds a Success Criteria section with checkable outcomes",
    applicable_intents: &[
        Intent::CodeGeneration,
        Intent::Planning,
        Intent::Testing,
        Intent::Refinement,
        Intent::PrdGeneration,
        Intent::Migration,
        Intent::Debugging,
    ],
    mode: PatternMode::Both,
    priority: 5,
    run_after: &[],
    config_schema: &[SettingSpec {
        key: "maxCriteria",
        description: "Maximum number of criteria",
        default: 5,
    }],
};

const HEADING: &str = "Success Criteria";
const EXISTING_SECTIONS: &[&str] = &["success criteria", "acceptance criteria", "definition of done"];
const EXISTING_PHRASES: &[&str] = &["done when", "acceptance criteria", "success criteria", "definition of done"];

const BASE_CRITERIA: IntentTable<&[&str]> = IntentTable {
    code_generation: &[
        "The main use case works end to end",
        "Invalid input is rejected with a clear message",
        "The code follows the conventions of the surrounding project",
    ],
    planning: &[
        "Every step has an owner or a concrete deliverable",
        "Risks and dependencies are listed",
        "Steps can run in the stated order",
    ],
    refinement: &[
        "Behaviour is unchanged and existing tests pass",
        "The targeted metric measurably improves",
        "No new warnings are introduced",
    ],
    debugging: &[
        "The reported issue no longer reproduces",
        "A regression test covers the fix",
        "Related functionality still works",
    ],
    documentation: &[],
    testing: &[
        "Tests cover the main path and the listed edge cases",
        "Tests are deterministic and pass locally",
        "Failures produce readable messages",
    ],
    migration: &[
        "All existing functionality works on the target version",
        "No data is lost",
        "A rollback path exists",
    ],
    security_review: &[],
    learning: &[],
    summarization: &[],
    prd_generation: &[
        "Each feature maps to a user need",
        "Success metrics are measurable",
        "Scope and non-goals are explicit",
    ],
};

/// Extra criteria for topics found in the request
const TOPIC_CRITERIA: &[(&[&str], &str)] = &[
    (&["login", "auth", "authentication", "sign in", "signin"], "Failed logins show an error without revealing which field was wrong"),
    (&["api", "endpoint", "endpoints"], "Endpoints return documented status codes"),
    (&["performance", "fast", "latency", "slow"], "The performance target is met and measured"),
    (&["form", "forms", "field", "fields", "submit", "submission"], "Every field is validated before submission"),
    (&["mobile", "responsive"], "The layout works on small screens"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct SuccessCriteriaEnforcer;

impl Pattern for SuccessCriteriaEnforcer {
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

        let lower = ctx.original_prompt.to_lowercase();
        if super::has_any_section(prompt, EXISTING_SECTIONS) || text::contains_any(&lower, EXISTING_PHRASES) {
            return Ok(PatternResult::unchanged(prompt, dimension, "Success criteria already defined"));
        }

        let mut criteria = Vec::new();
        for (topics, criterion) in TOPIC_CRITERIA {
            if text::contains_any(&lower, topics) {
                super::push_unique(&mut criteria, criterion);
            }
        }
        for criterion in BASE_CRITERIA.get(ctx.intent.primary_intent).iter() {
            super::push_unique(&mut criteria, criterion);
        }

        let criteria = text::cap(criteria, super::setting(&META, settings, "maxCriteria"));
        if criteria.is_empty() {
            return Ok(PatternResult::unchanged(prompt, dimension, "No criteria apply"));
        }

        let block = text::render_section(HEADING, &criteria);
        Ok(PatternResult::applied(
            text::append_block(prompt, &block),
            dimension,
            format!("Added {} success criteria", criteria.len()),
            Impact::from_count(criteria.len()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::context::Mode;
    use crate::brain::intent::IntentResult;

    fn run(prompt: &str, intent: Intent) -> PatternResult {
        let ctx = PatternContext::new(Mode::Fast, prompt, IntentResult::supplied(intent, prompt));
        SuccessCriteriaEnforcer.apply(prompt, &ctx, &PatternSettings::default()).unwrap()
    }

    #[test]
    fn test_topic_criteria_come_first() {
        let result = run("Create a login page", Intent::CodeGeneration);
        assert!(result.applied);
        assert!(result
            .enhanced_prompt
            .contains("## Success Criteria\n\n- Failed logins show an error without revealing which field was wrong\n- The main use case works end to end"));
        assert_eq!(result.improvement.impact, Impact::High);
    }

    #[test]
    fn test_existing_criteria_respected() {
        assert!(!run("Fix the parser. Done when the fuzz suite passes.", Intent::Debugging).applied);
        assert!(!run("Fix it\n\nAcceptance Criteria:\n- green CI", Intent::Debugging).applied);
    }

    #[test]
    fn test_input_alone_does_not_mean_a_form() {
        let result = run("The parser fails on empty input", Intent::Debugging);
        assert!(result.applied);
        assert!(!result.enhanced_prompt.contains("Every field is validated"), "{}", result.enhanced_prompt);

        let form = run("The signup form fails on submit", Intent::Debugging);
        assert!(form.enhanced_prompt.contains("Every field is validated before submission"));
    }

    #[test]
    fn test_default_cap() {
        let result = run("Build a fast mobile login form for the API", Intent::CodeGeneration);
        assert_eq!(result.enhanced_prompt.matches("\n- ").count(), 5);
    }
}
