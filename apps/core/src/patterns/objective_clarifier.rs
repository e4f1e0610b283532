//! Puts the objective of the prompt first, under its own heading.

use super::{Impact, ImprovementDimension, Pattern, PatternMeta, PatternMode, PatternResult, PatternSettings};
use crate::brain::context::PatternContext;
use crate::brain::intent::{Intent, IntentTable};
use crate::brain::{signals, text};
use crate::error::PatternError;

static META: PatternMeta = PatternMeta {
    id: "objective-clarifier",
    name: "Objective Clarifier",
    description: "States the objective first under an Objective heading",
    applicable_intents: &Intent::ALL,
    mode: PatternMode::Both,
    priority: 9,
    run_after: &[],
    config_schema: &[],
};

/// Verb used when no sentence opens with one
const DEFAULT_VERBS: IntentTable<&str> = IntentTable {
    code_generation: "Implement",
    planning: "Plan",
    refinement: "Improve",
    debugging: "Fix",
    documentation: "Document",
    testing: "Write tests for",
    migration: "Migrate",
    security_review: "Review the security of",
    learning: "Explain",
    summarization: "Summarize",
    prd_generation: "Write a PRD for",
};

const OBJECTIVE_SECTIONS: &[&str] = &["objective", "objectives", "goal", "goals"];

#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectiveClarifier;

impl ObjectiveClarifier {
    /// The sentence that carries the objective: the first one opening with an
    /// action verb, else the first sentence.
    fn objective_sentence(prompt: &str) -> Option<(String, bool)> {
        let sentences = text::sentences(prompt);
        let with_verb = sentences
            .iter()
            .find(|s| signals::leading_action_verb(s).is_some())
            .map(|s| (s.clone(), true));
        with_verb.or_else(|| sentences.first().map(|s| (s.clone(), false)))
    }
}

impl Pattern for ObjectiveClarifier {
    fn meta(&self) -> &'static PatternMeta {
        &META
    }

    fn apply(
        &self,
        prompt: &str,
        ctx: &PatternContext,
        _settings: &PatternSettings,
    ) -> Result<PatternResult, PatternError> {
        let dimension = ImprovementDimension::Clarity;

        if super::has_any_section(prompt, OBJECTIVE_SECTIONS) {
            return Ok(PatternResult::unchanged(prompt, dimension, "Objective already stated"));
        }
        let Some((sentence, has_verb)) = Self::objective_sentence(prompt) else {
            return Ok(PatternResult::unchanged(prompt, dimension, "Nothing to clarify"));
        };

        let core = text::strip_terminal_punctuation(&sentence);
        let objective = if has_verb {
            text::capitalize_first(core)
        } else {
            let verb = DEFAULT_VERBS.get(ctx.intent.primary_intent);
            format!("{}: {}", verb, core)
        };

        // the objective sentence leaves the body only when it opens the prompt
        let body = prompt.trim();
        let remainder = body
            .strip_prefix(sentence.as_str())
            .map_or(body, str::trim_start);

        let enhanced = if remainder.is_empty() {
            format!("# Objective\n\n{}", objective)
        } else {
            format!("# Objective\n\n{}\n\n{}", objective, remainder)
        };

        let (description, impact) = if has_verb {
            ("Moved the objective to the top", Impact::Low)
        } else {
            ("Inferred an explicit objective from the request", Impact::Medium)
        };
        Ok(PatternResult::applied(enhanced, dimension, description, impact))
    }
}
