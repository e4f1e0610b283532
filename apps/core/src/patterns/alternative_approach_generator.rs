//! Asks for alternatives to be weighed before committing to one approach.

use super::{Impact, ImprovementDimension, Pattern, PatternMeta, PatternMode, PatternResult, PatternSettings, SettingSpec};
use crate::brain::context::PatternContext;
use crate::brain::intent::{Intent, IntentTable};
use crate::brain::quality::ALTERNATIVE_MARKERS;
use crate::brain::text;
use crate::error::PatternError;

static META: PatternMeta = PatternMeta {
    id: "alternative-approach-generator",
    name: "Alternative Approach Generator",
    description: "Adds alternative approaches to compare before choosing one",
    applicable_intents: &[
        Intent::Planning,
        Intent::CodeGeneration,
        Intent::Refinement,
        Intent::Learning,
    ],
    mode: PatternMode::Deep,
    priority: 2,
    run_after: &[],
    config_schema: &[SettingSpec {
        key: "maxAlternatives",
        description: "Maximum number of alternatives",
        default: 3,
    }],
};

const HEADING: &str = "Alternative Approaches";

const TOPIC_ALTERNATIVES: &[(&[&str], &str)] = &[
    (&["state", "store", "redux"], "Local component state versus a global store"),
    (&["database", "storage", "persist", "persistence"], "Relational database versus document store"),
    (&["api", "endpoint", "endpoints"], "REST versus GraphQL"),
    (&["auth", "login", "signup"], "Self-hosted authentication versus a managed provider"),
    (&["ui", "page", "component", "frontend"], "Server-rendered pages versus a client-side app"),
    (&["performance", "optimize", "optimise", "slow"], "Caching versus an algorithmic fix"),
    (&["deploy", "hosting", "server", "servers"], "Managed platform versus self-managed servers"),
    (&["test", "tests", "testing"], "Unit tests with mocks versus integration tests against real services"),
];

const FALLBACK: IntentTable<&str> = IntentTable {
    code_generation: "Build in-house versus adopt an existing library",
    planning: "Incremental rollout versus a single release",
    refinement: "Targeted fixes versus a broader restructure",
    debugging: "Patch the symptom now versus fix the root cause",
    documentation: "Reference docs versus task-oriented guides",
    testing: "Example-based tests versus property-based tests",
    migration: "Big-bang cutover versus gradual migration",
    security_review: "Manual review versus automated scanning",
    learning: "Start from a concrete example versus from first principles",
    summarization: "Chronological summary versus summary by theme",
    prd_generation: "Narrow MVP versus broad first release",
};

#[derive(Debug, Clone, Copy, Default)]
pub struct AlternativeApproachGenerator;

impl Pattern for AlternativeApproachGenerator {
    fn meta(&self) -> &'static PatternMeta {
        &META
    }

    fn apply(
        &self,
        prompt: &str,
        ctx: &PatternContext,
        settings: &PatternSettings,
    ) -> Result<PatternResult, PatternError> {
        let dimension = ImprovementDimension::Explicitness;

        let lower = ctx.original_prompt.to_lowercase();
        if text::has_section(prompt, HEADING) || text::contains_any(&lower, ALTERNATIVE_MARKERS) {
            return Ok(PatternResult::unchanged(prompt, dimension, "Alternatives already considered"));
        }
        if lower.trim().is_empty() {
            return Ok(PatternResult::unchanged(prompt, dimension, "Nothing to compare"));
        }

        let mut alternatives: Vec<String> = TOPIC_ALTERNATIVES
            .iter()
            .filter(|(triggers, _)| text::contains_any(&lower, triggers))
            .map(|(_, alternative)| alternative.to_string())
            .collect();
        if alternatives.is_empty() {
            alternatives.push(FALLBACK.get(ctx.intent.primary_intent).to_string());
        }

        let alternatives = text::cap(alternatives, super::setting(&META, settings, "maxAlternatives"));
        if alternatives.is_empty() {
            return Ok(PatternResult::unchanged(prompt, dimension, "Alternatives capped to nothing"));
        }

        let mut block = text::render_section(HEADING, &alternatives);
        block.push_str("\n\nState which approach you chose and the trade-off that decided it.");
        Ok(PatternResult::applied(
            text::append_block(prompt, &block),
            dimension,
            format!("Suggested {} alternative(s) to compare", alternatives.len()),
            Impact::from_count(alternatives.len()),
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
        AlternativeApproachGenerator.apply(prompt, &ctx, &PatternSettings::default()).unwrap()
    }

    #[test]
    fn test_topic_alternatives_capped() {
        let result = run("Create a login page backed by a database and an API", Intent::CodeGeneration);
        assert!(result.applied);
        assert_eq!(result.enhanced_prompt.matches("\n- ").count(), 3);
        assert!(result.enhanced_prompt.ends_with("the trade-off that decided it."));
        assert_eq!(result.improvement.impact, Impact::Medium);
    }

    #[test]
    fn test_fallback_per_intent() {
        let result = run("Learn Rust ownership", Intent::Learning);
        assert!(result.enhanced_prompt.contains("- Start from a concrete example versus from first principles"));
    }

    #[test]
    fn test_existing_alternatives_respected() {
        assert!(!run("Plan the rollout and consider the trade-offs", Intent::Planning).applied);
    }
}
