//! Lists what has to be in place before the work can start.

use super::{Impact, ImprovementDimension, Pattern, PatternMeta, PatternMode, PatternResult, PatternSettings, SettingSpec};
use crate::brain::context::PatternContext;
use crate::brain::intent::{Intent, IntentTable};
use crate::brain::{signals, text};
use crate::error::PatternError;

static META: PatternMeta = PatternMeta {
    id: "prerequisite-identifier",
    name: "Prerequisite Identifier",
    description: "Adds a Prerequisites section for tools, access and data",
    applicable_intents: &[
        Intent::CodeGeneration,
        Intent::Migration,
        Intent::Planning,
        Intent::Testing,
    ],
    mode: PatternMode::Deep,
    priority: 4,
    run_after: &[],
    config_schema: &[SettingSpec {
        key: "maxItems",
        description: "Maximum number of prerequisites",
        default: 6,
    }],
};

const HEADING: &str = "Prerequisites";
const EXISTING_SECTIONS: &[&str] = &["prerequisites", "requirements before", "setup"];

const TOPIC_PREREQUISITES: &[(&[&str], &str)] = &[
    (
        &["database", "db", "sql", "schema", "postgres", "mysql", "mongodb"],
        "Database access and the current schema for local development",
    ),
    (
        &["stripe", "oauth", "third-party", "external", "api key", "integration"],
        "Credentials or API keys for external services",
    ),
    (&["docker", "container", "kubernetes"], "Docker available locally"),
    (&["deploy", "deployment", "production", "staging"], "Access to the target environment"),
    (&["design", "figma", "mockup", "mockups"], "The approved designs or mockups"),
];

const INTENT_PREREQUISITES: IntentTable<&[&str]> = IntentTable {
    code_generation: &[],
    planning: &["Agreement with stakeholders on the goal and constraints"],
    refinement: &[],
    debugging: &[],
    documentation: &[],
    testing: &["A test runner installed and a command to run the suite"],
    migration: &[
        "A backup of the current code and data",
        "The changelog of the target version",
    ],
    security_review: &[],
    learning: &[],
    summarization: &[],
    prd_generation: &[],
};

#[derive(Debug, Clone, Copy, Default)]
pub struct PrerequisiteIdentifier;

impl Pattern for PrerequisiteIdentifier {
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

        if super::has_any_section(prompt, EXISTING_SECTIONS) {
            return Ok(PatternResult::unchanged(prompt, dimension, "Prerequisites already listed"));
        }

        let lower = ctx.original_prompt.to_lowercase();
        let mut items = Vec::new();
        for term in signals::tech_stack(&ctx.original_prompt) {
            items.push(format!("{} installed and configured, with the version stated", term));
        }
        for (triggers, item) in TOPIC_PREREQUISITES {
            if text::contains_any(&lower, triggers) {
                super::push_unique(&mut items, item);
            }
        }
        for item in INTENT_PREREQUISITES.get(ctx.intent.primary_intent).iter() {
            super::push_unique(&mut items, item);
        }

        let items = text::cap(items, super::setting(&META, settings, "maxItems"));
        if items.is_empty() {
            return Ok(PatternResult::unchanged(prompt, dimension, "No prerequisites identified"));
        }

        let block = text::render_section(HEADING, &items);
        Ok(PatternResult::applied(
            text::append_block(prompt, &block),
            dimension,
            format!("Listed {} prerequisite(s)", items.len()),
            Impact::from_count(items.len()),
        ))
    }
}
