//! Lists edge cases implied by the topics of the request.

use super::{Impact, ImprovementDimension, Pattern, PatternMeta, PatternMode, PatternResult, PatternSettings, SettingSpec};
use crate::brain::context::PatternContext;
use crate::brain::intent::{Intent, IntentTable};
use crate::brain::text;
use crate::error::PatternError;

static META: PatternMeta = PatternMeta {
    id: "edge-case-identifier",
    name: "Edge Case Identifier",
    description: "Adds an Edge Cases section derived from the topics of the request",
    applicable_intents: &[
        Intent::CodeGeneration,
        Intent::Testing,
        Intent::Debugging,
        Intent::SecurityReview,
    ],
    mode: PatternMode::Deep,
    priority: 5,
    run_after: &[],
    config_schema: &[SettingSpec {
        key: "maxEdgeCases",
        description: "Maximum number of edge cases",
        default: 8,
    }],
};

const HEADING: &str = "Edge Cases";

const TOPIC_EDGE_CASES: &[(&[&str], &[&str])] = &[
    (
        &["input", "form", "field", "fields", "text"],
        &["Empty and whitespace-only input", "Very long input", "Special characters and emoji"],
    ),
    (
        &["login", "auth", "password", "signin", "sign in", "session"],
        &["Wrong password and locked accounts", "Expired or revoked sessions"],
    ),
    (
        &["upload", "file", "files", "image", "images"],
        &["Empty files and files over the size limit", "Unsupported file types"],
    ),
    (
        &["api", "endpoint", "request", "fetch", "http"],
        &["Timeouts and network failures", "Malformed request bodies"],
    ),
    (
        &["list", "table", "pagination", "search", "results"],
        &["Empty result sets", "Very large result sets"],
    ),
    (&["date", "time", "schedule", "calendar"], &["Time zone and daylight saving boundaries"]),
    (
        &["payment", "checkout", "cart", "order"],
        &["Declined payments", "Duplicate submissions"],
    ),
    (
        &["concurrent", "parallel", "async", "queue", "threads"],
        &["Concurrent updates to the same record"],
    ),
    (
        &["number", "amount", "price", "quantity", "calculate", "calculation"],
        &["Zero, negative and overflowing values"],
    ),
];

const INTENT_EDGE_CASES: IntentTable<&[&str]> = IntentTable {
    code_generation: &["Missing or null values"],
    planning: &[],
    refinement: &[],
    debugging: &["Conditions under which the bug does not reproduce"],
    documentation: &[],
    testing: &["Boundary values of every input"],
    migration: &[],
    security_review: &["Inputs crafted to bypass validation", "Requests from unauthenticated users"],
    learning: &[],
    summarization: &[],
    prd_generation: &[],
};

#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeCaseIdentifier;

impl Pattern for EdgeCaseIdentifier {
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
            return Ok(PatternResult::unchanged(prompt, dimension, "Edge cases already listed"));
        }

        let lower = ctx.original_prompt.to_lowercase();
        let mut cases = Vec::new();
        for (topics, topic_cases) in TOPIC_EDGE_CASES {
            if text::contains_any(&lower, topics) {
                for case in topic_cases.iter() {
                    super::push_unique(&mut cases, case);
                }
            }
        }
        for case in INTENT_EDGE_CASES.get(ctx.intent.primary_intent).iter() {
            super::push_unique(&mut cases, case);
        }

        let cases = text::cap(cases, super::setting(&META, settings, "maxEdgeCases"));
        if cases.is_empty() {
            return Ok(PatternResult::unchanged(prompt, dimension, "No edge cases identified"));
        }

        let block = text::render_section(HEADING, &cases);
        Ok(PatternResult::applied(
            text::append_block(prompt, &block),
            dimension,
            format!("Identified {} edge case(s)", cases.len()),
            Impact::from_count(cases.len()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::context::Mode;
    use crate::brain::intent::IntentResult;

    fn run(prompt: &str, intent: Intent, settings: &PatternSettings) -> PatternResult {
        let ctx = PatternContext::new(Mode::Deep, prompt, IntentResult::supplied(intent, prompt));
        EdgeCaseIdentifier.apply(prompt, &ctx, settings).unwrap()
    }

    #[test]
    fn test_login_form_edge_cases() {
        let result = run("Create a login form", Intent::CodeGeneration, &PatternSettings::default());
        assert!(result.applied);
        assert!(result.enhanced_prompt.contains("## Edge Cases\n\n- Empty and whitespace-only input"));
        assert!(result.enhanced_prompt.contains("- Expired or revoked sessions"));
        assert!(result.enhanced_prompt.ends_with("- Missing or null values"));
        assert_eq!(result.improvement.impact, Impact::High);
    }

    #[test]
    fn test_cap_and_second_pass() {
        let settings: PatternSettings = serde_json::from_str(r#"{"maxEdgeCases": 2}"#).unwrap();
        let first = run("Write tests for the upload API", Intent::Testing, &settings);
        assert_eq!(first.enhanced_prompt.matches("\n- ").count(), 2);
        assert!(!run(&first.enhanced_prompt, Intent::Testing, &settings).applied);
    }
}
