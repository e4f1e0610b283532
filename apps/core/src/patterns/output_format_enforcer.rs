//! Specifies the shape of the answer when the request does not.

use super::{Impact, ImprovementDimension, Pattern, PatternMeta, PatternMode, PatternResult, PatternSettings};
use crate::brain::context::PatternContext;
use crate::brain::intent::{Intent, IntentTable};
use crate::brain::{signals, text};
use crate::error::PatternError;

static META: PatternMeta = PatternMeta {
    id: "output-format-enforcer",
    name: "Output Format Enforcer",
    description: "Adds an Output Format section suited to the intent",
    applicable_intents: &[
        Intent::CodeGeneration,
        Intent::Documentation,
        Intent::Summarization,
        Intent::Testing,
        Intent::Learning,
    ],
    mode: PatternMode::Both,
    priority: 5,
    run_after: &[],
    config_schema: &[],
};

const HEADING: &str = "Output Format";

const FORMATS: IntentTable<&[&str]> = IntentTable {
    code_generation: &[
        "Complete, runnable code in fenced code blocks, with the file path above each block",
        "A short note on how to run or integrate it",
    ],
    planning: &["Numbered phases, each with deliverables"],
    refinement: &["The changed code as a diff", "One line per change explaining the gain"],
    debugging: &["Root cause first, then the fix as a diff"],
    documentation: &[
        "Markdown with a title, an overview and one section per topic",
        "Code examples in fenced blocks",
    ],
    testing: &[
        "Test files in fenced code blocks, one block per file",
        "A list of the scenarios covered",
    ],
    migration: &["Ordered migration steps, then the changed files"],
    security_review: &["Findings ranked by severity, each with a remediation"],
    learning: &[
        "A plain-language explanation first, then the details",
        "One small worked example",
    ],
    summarization: &[
        "A one-sentence overview followed by bullet points",
        "Decisions and open questions called out separately",
    ],
    prd_generation: &["Markdown document with one heading per PRD section"],
};

#[derive(Debug, Clone, Copy, Default)]
pub struct OutputFormatEnforcer;

impl Pattern for OutputFormatEnforcer {
    fn meta(&self) -> &'static PatternMeta {
        &META
    }

    fn apply(
        &self,
        prompt: &str,
        ctx: &PatternContext,
        _settings: &PatternSettings,
    ) -> Result<PatternResult, PatternError> {
        let dimension = ImprovementDimension::Explicitness;

        if text::has_section(prompt, HEADING) {
            return Ok(PatternResult::unchanged(prompt, dimension, "Output format already specified"));
        }
        if signals::has_output_format(&ctx.original_prompt) {
            return Ok(PatternResult::unchanged(prompt, dimension, "Request already names an output format"));
        }

        let lines: Vec<String> = FORMATS
            .get(ctx.intent.primary_intent)
            .iter()
            .map(|s| s.to_string())
            .collect();
        let block = text::render_section(HEADING, &lines);
        Ok(PatternResult::applied(
            text::append_block(prompt, &block),
            dimension,
            format!("Specified the output format for {}", ctx.intent.primary_intent),
            Impact::from_count(lines.len()),
        ))
    }
}
