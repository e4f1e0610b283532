//! Replaces vague requests with concrete instructions.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use super::{Impact, ImprovementDimension, Pattern, PatternMeta, PatternMode, PatternResult, PatternSettings};
use crate::brain::context::PatternContext;
use crate::brain::intent::Intent;
use crate::brain::text;
use crate::error::PatternError;

static META: PatternMeta = PatternMeta {
    id: "actionability-enhancer",
    name: "Actionability Enhancer",
    description: "Rewrites vague phrases into concrete, checkable instructions",
    applicable_intents: &[
        Intent::CodeGeneration,
        Intent::Planning,
        Intent::Refinement,
        Intent::Debugging,
        Intent::Documentation,
        Intent::Testing,
        Intent::Migration,
        Intent::SecurityReview,
        Intent::PrdGeneration,
    ],
    mode: PatternMode::Both,
    priority: 6,
    run_after: &[],
    config_schema: &[],
};

/// Vague phrase and its concrete replacement. No replacement contains a
/// vague phrase, so a second pass finds nothing.
const VAGUE_PHRASES: &[(&str, &str)] = &[
    ("make it better", "improve readability and performance, and list each change"),
    ("make it nice", "give it a clean, consistent visual design"),
    ("make it pretty", "give it a clean, consistent visual design"),
    ("make it work", "make it run without errors and pass its tests"),
    ("fix it", "fix the failing behaviour described above"),
    ("clean it up", "remove dead code and duplicated logic"),
    ("user-friendly", "easy to use, with clear labels and helpful error messages"),
    ("and so on", "(list the remaining items explicitly)"),
    ("etc.", "(list the remaining items explicitly)"),
    ("some stuff", "the specific items"),
    ("asap", "as the top priority"),
    ("whatever works", "the simplest approach that meets the requirements"),
];

static VAGUE_RES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    VAGUE_PHRASES
        .iter()
        .map(|(phrase, replacement)| {
            let tail = if phrase.ends_with(|c: char| c.is_alphanumeric()) { r"\b" } else { "" };
            let re = Regex::new(&format!(r"(?i)\b{}{}", regex::escape(phrase), tail))
                .expect("Invalid regex: vague phrase");
            (re, *replacement)
        })
        .collect()
});

#[derive(Debug, Clone, Copy, Default)]
pub struct ActionabilityEnhancer;

impl Pattern for ActionabilityEnhancer {
    fn meta(&self) -> &'static PatternMeta {
        &META
    }

    fn apply(
        &self,
        prompt: &str,
        _ctx: &PatternContext,
        _settings: &PatternSettings,
    ) -> Result<PatternResult, PatternError> {
        let dimension = ImprovementDimension::Actionability;

        // indices into VAGUE_PHRASES, each counted once
        let mut replaced: Vec<usize> = Vec::new();
        let enhanced = text::rewrite_prose(prompt, |line| {
            let mut working = line.to_string();
            for (index, (re, replacement)) in VAGUE_RES.iter().enumerate() {
                if !re.is_match(&working) {
                    continue;
                }
                if !replaced.contains(&index) {
                    replaced.push(index);
                }
                working = re
                    .replace_all(&working, |caps: &Captures| {
                        // keep sentence-initial capitals, not all-caps shouting
                        let mut chars = caps[0].chars();
                        let title_case = chars.next().is_some_and(char::is_uppercase)
                            && chars.next().map_or(true, |c| !c.is_uppercase());
                        if title_case {
                            text::capitalize_first(replacement)
                        } else {
                            replacement.to_string()
                        }
                    })
                    .into_owned();
            }
            Some(working)
        });

        if replaced.is_empty() {
            return Ok(PatternResult::unchanged(prompt, dimension, "No vague phrasing found"));
        }
        Ok(PatternResult::applied(
            enhanced,
            dimension,
            format!("Made {} vague phrase(s) concrete", replaced.len()),
            Impact::from_count(replaced.len()),
        ))
    }
}
