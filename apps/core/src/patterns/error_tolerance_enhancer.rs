//! Spells out how the result should behave when things go wrong.

use super::{Impact, ImprovementDimension, Pattern, PatternMeta, PatternMode, PatternResult, PatternSettings, SettingSpec};
use crate::brain::context::PatternContext;
use crate::brain::intent::{Intent, IntentTable};
use crate::brain::text;
use crate::error::PatternError;

static META: PatternMeta = PatternMeta {
    id: "error-tolerance-enhancer",
    name: "Error Tolerance Enhancer",
    description: "Adds error handling expectations for the failure points of the request",
    applicable_intents: &[Intent::CodeGeneration, Intent::Debugging, Intent::Migration],
    mode: PatternMode::Deep,
    priority: 4,
    run_after: &[],
    config_schema: &[SettingSpec {
        key: "maxItems",
        description: "Maximum number of error handling items",
        default: 6,
    }],
};

const HEADING: &str = "Error Handling";
const HANDLED_PHRASES: &[&str] = &["error handling", "retry", "retries", "fallback", "graceful"];

const FAILURE_POINTS: &[(&[&str], &str)] = &[
    (
        &["api", "network", "fetch", "request", "http", "endpoint"],
        "Retry transient network failures with backoff, then surface a clear message",
    ),
    (
        &["database", "db", "query", "sql", "transaction"],
        "Wrap multi-step writes in a transaction and roll back on failure",
    ),
    (
        &["file", "files", "upload", "read", "write", "disk"],
        "Report missing or unreadable files without crashing",
    ),
    (
        &["input", "form", "user", "users", "parse", "parser"],
        "Validate input at the boundary and return actionable error messages",
    ),
    (
        &["payment", "checkout", "order"],
        "Make payment operations idempotent so a retry never charges twice",
    ),
];

const INTENT_ITEMS: IntentTable<&[&str]> = IntentTable {
    code_generation: &[],
    planning: &[],
    refinement: &[],
    debugging: &["Log around the failing path to confirm the fix in production"],
    documentation: &[],
    testing: &[],
    migration: &[
        "Keep the old path working until the migration is verified",
        "Log every record that fails to migrate",
    ],
    security_review: &[],
    learning: &[],
    summarization: &[],
    prd_generation: &[],
};

const BASELINE: &str = "Log errors with enough context to diagnose them";

#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorToleranceEnhancer;

impl Pattern for ErrorToleranceEnhancer {
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
        if text::has_section(prompt, HEADING) || text::contains_any(&lower, HANDLED_PHRASES) {
            return Ok(PatternResult::unchanged(prompt, dimension, "Error handling already addressed"));
        }
        if lower.trim().is_empty() {
            return Ok(PatternResult::unchanged(prompt, dimension, "Nothing to make error tolerant"));
        }

        let mut items = Vec::new();
        for (triggers, item) in FAILURE_POINTS {
            if text::contains_any(&lower, triggers) {
                super::push_unique(&mut items, item);
            }
        }
        for item in INTENT_ITEMS.get(ctx.intent.primary_intent).iter() {
            super::push_unique(&mut items, item);
        }
        super::push_unique(&mut items, BASELINE);

        let items = text::cap(items, super::setting(&META, settings, "maxItems"));
        if items.is_empty() {
            return Ok(PatternResult::unchanged(prompt, dimension, "Error handling capped to nothing"));
        }

        let block = text::render_section(HEADING, &items);
        Ok(PatternResult::applied(
            text::append_block(prompt, &block),
            dimension,
            format!("Added {} error handling expectation(s)", items.len()),
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
        ErrorToleranceEnhancer.apply(prompt, &ctx, &PatternSettings::default()).unwrap()
    }

    #[test]
    fn test_failure_points_from_topics() {
        let result = run("Build an API that stores orders in a SQL database", Intent::CodeGeneration);
        assert!(result.applied);
        assert!(result.enhanced_prompt.contains("- Retry transient network failures"));
        assert!(result.enhanced_prompt.contains("- Wrap multi-step writes in a transaction"));
        assert!(result.enhanced_prompt.ends_with("- Log errors with enough context to diagnose them"));
    }

    #[test]
    fn test_migration_items() {
        let result = run("Migrate the billing service to Python 3.12", Intent::Migration);
        assert!(result.enhanced_prompt.contains("- Keep the old path working until the migration is verified"));
        assert_eq!(result.improvement.impact, Impact::Medium);
    }

    #[test]
    fn test_existing_handling_respected() {
        assert!(!run("Fetch prices with a retry on timeout", Intent::CodeGeneration).applied);
    }
}
