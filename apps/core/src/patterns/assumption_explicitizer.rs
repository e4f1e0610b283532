//! States the assumptions a request silently relies on.

use super::{Impact, ImprovementDimension, Pattern, PatternMeta, PatternMode, PatternResult, PatternSettings, SettingSpec};
use crate::brain::context::PatternContext;
use crate::brain::intent::{Intent, IntentTable};
use crate::brain::{signals, text};
use crate::error::PatternError;

static META: PatternMeta = PatternMeta {
    id: "assumption-explicitizer",
    name: "Assumption Explicitizer",
    description: "Adds an Assumptions section for unstated defaults",
    applicable_intents: &Intent::ALL,
    mode: PatternMode::Deep,
    priority: 3,
    run_after: &[],
    config_schema: &[SettingSpec {
        key: "maxAssumptions",
        description: "Maximum number of assumptions",
        default: 6,
    }],
};

const HEADING: &str = "Assumptions";

const SCALE_MARKERS: &[&str] = &["users", "scale", "traffic", "load", "requests per", "concurrent"];
const PLATFORM_MARKERS: &[&str] = &["browser", "mobile", "ios", "android", "desktop", "platform", "server"];
const UI_MARKERS: &[&str] = &["page", "ui", "frontend", "component", "screen", "form"];
const CODEBASE_MARKERS: &[&str] = &["existing", "current", "from scratch", "new project", "legacy", "codebase"];
const TEST_MARKERS: &[&str] = &["test", "tests", "testing", "spec", "specs"];

/// Assumptions that depend on the intent alone
const INTENT_ASSUMPTIONS: IntentTable<Option<&str>> = IntentTable {
    code_generation: None,
    planning: Some("The plan targets the current team size"),
    refinement: Some("Public interfaces may not change"),
    debugging: Some("The bug reproduces reliably in a local environment"),
    documentation: Some("Documentation lives next to the code as Markdown"),
    testing: None,
    migration: Some("The migration can happen in stages"),
    security_review: Some("The review covers application code, not infrastructure"),
    learning: Some("The reader knows general programming but not this topic"),
    summarization: Some("The audience already knows the project basics"),
    prd_generation: Some("The first release targets a single market"),
};

#[derive(Debug, Clone, Copy, Default)]
pub struct AssumptionExplicitizer;

impl Pattern for AssumptionExplicitizer {
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

        if text::has_section(prompt, HEADING) {
            return Ok(PatternResult::unchanged(prompt, dimension, "Assumptions already stated"));
        }
        let original = &ctx.original_prompt;
        if original.trim().is_empty() {
            return Ok(PatternResult::unchanged(prompt, dimension, "Nothing to base assumptions on"));
        }

        let lower = original.to_lowercase();
        let is_code = matches!(
            ctx.intent.primary_intent,
            Intent::CodeGeneration | Intent::Refinement | Intent::Debugging | Intent::Testing | Intent::Migration
        );

        let mut assumptions = Vec::new();
        if let Some(assumption) = INTENT_ASSUMPTIONS.get(ctx.intent.primary_intent) {
            assumptions.push(assumption.to_string());
        }
        if is_code {
            if !signals::has_tech_stack(original) {
                assumptions.push("The existing project stack is used; no new frameworks".to_string());
            }
            if !text::contains_any(&lower, CODEBASE_MARKERS) {
                assumptions.push("The work happens inside an existing codebase".to_string());
            }
            if !text::contains_any(&lower, TEST_MARKERS) {
                assumptions.push("Tests follow the existing testing approach of the project".to_string());
            }
        }
        if text::contains_any(&lower, UI_MARKERS) && !text::contains_any(&lower, PLATFORM_MARKERS) {
            assumptions.push("The target platform is a current desktop browser".to_string());
        }
        if !text::contains_any(&lower, SCALE_MARKERS) {
            assumptions.push("Expected load is modest; no special scaling work".to_string());
        }

        let assumptions = text::cap(assumptions, super::setting(&META, settings, "maxAssumptions"));
        if assumptions.is_empty() {
            return Ok(PatternResult::unchanged(prompt, dimension, "No hidden assumptions found"));
        }

        let block = text::render_section(HEADING, &assumptions);
        Ok(PatternResult::applied(
            text::append_block(prompt, &block),
            dimension,
            format!("Made {} assumption(s) explicit", assumptions.len()),
            Impact::from_count(assumptions.len()),
        ))
    }
}
