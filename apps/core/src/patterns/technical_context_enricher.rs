//! Asks for the technical context an agent needs before touching code.

use super::{Impact, ImprovementDimension, Pattern, PatternMeta, PatternMode, PatternResult, PatternSettings, SettingSpec};
use crate::brain::context::PatternContext;
use crate::brain::intent::{Intent, IntentTable};
use crate::brain::{signals, text};
use crate::error::PatternError;

static META: PatternMeta = PatternMeta {
    id: "technical-context-enricher",
    name: "Technical Context Enricher",
    description: "Asks for stack, environment and code context that the request leaves out",
    applicable_intents: &[
        Intent::CodeGeneration,
        Intent::Debugging,
        Intent::Testing,
        Intent::Migration,
        Intent::Refinement,
    ],
    mode: PatternMode::Both,
    priority: 8,
    run_after: &[],
    config_schema: &[SettingSpec {
        key: "maxQuestions",
        description: "Maximum number of context questions",
        default: 6,
    }],
};

const HEADING: &str = "Technical Context";

/// A question and the phrases that show it is already answered
type Question = (&'static str, &'static [&'static str]);

const QUESTIONS: IntentTable<&[Question]> = IntentTable {
    code_generation: &[
        ("Existing files or modules this should integrate with", &["existing", "file", "module", "codebase", "repo"]),
        ("Styling or UI library in use", &["css", "tailwind", "styled", "material", "bootstrap", "ui library"]),
        ("Data source and persistence", &["database", "api", "endpoint", "storage", "db"]),
    ],
    planning: &[],
    refinement: &[
        ("The code to refine, as a file path or snippet", &["```", "file", "function", "module"]),
        ("Behaviour and public API that must stay the same", &["keep", "preserve", "public api", "backward"]),
    ],
    debugging: &[
        ("Exact error message or stack trace", &["error:", "exception", "stack trace", "traceback", "```"]),
        ("Steps to reproduce", &["reproduce", "steps", "when i", "after"]),
        ("Environment: OS, runtime and dependency versions", &["version", "windows", "linux", "macos", "browser"]),
        ("What changed since it last worked", &["changed", "since", "after updating", "regression"]),
    ],
    documentation: &[],
    testing: &[
        ("Test framework and runner", &["jest", "pytest", "vitest", "mocha", "junit", "cargo test", "framework"]),
        ("Code under test, as a file path or snippet", &["```", "file", "function", "module", "class"]),
        ("How external services are mocked", &["mock", "stub", "fake", "fixture"]),
    ],
    migration: &[
        ("Current and target versions", &["version", "from"]),
        ("Size of the affected codebase", &["files", "modules", "lines", "services"]),
        ("Data that must be preserved", &["data", "records", "schema"]),
    ],
    security_review: &[],
    learning: &[],
    summarization: &[],
    prd_generation: &[],
};

#[derive(Debug, Clone, Copy, Default)]
pub struct TechnicalContextEnricher;

impl Pattern for TechnicalContextEnricher {
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
            return Ok(PatternResult::unchanged(prompt, dimension, "Technical context already requested"));
        }

        let lower = ctx.original_prompt.to_lowercase();
        let mut questions = Vec::new();
        if !signals::has_tech_stack(&ctx.original_prompt) {
            questions.push("Language, framework and runtime versions".to_string());
        }
        for (question, answered_by) in QUESTIONS.get(ctx.intent.primary_intent).iter() {
            let answered = answered_by
                .iter()
                .any(|marker| text::contains_phrase(&lower, marker) || (marker.starts_with('`') && lower.contains(marker)));
            if !answered {
                super::push_unique(&mut questions, question);
            }
        }

        let questions = text::cap(questions, super::setting(&META, settings, "maxQuestions"));
        if questions.is_empty() {
            return Ok(PatternResult::unchanged(prompt, dimension, "Technical context already provided"));
        }

        let block = text::render_section(HEADING, &questions);
        Ok(PatternResult::applied(
            text::append_block(prompt, &block),
            dimension,
            format!("Asked for {} piece(s) of technical context", questions.len()),
            Impact::from_count(questions.len()),
        ))
    }
}
