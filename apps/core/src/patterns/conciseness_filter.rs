//! Strips pleasantries, hedges and filler from a prompt.

use regex::Regex;
use std::sync::LazyLock;

use super::{Impact, ImprovementDimension, Pattern, PatternMeta, PatternMode, PatternResult, PatternSettings};
use crate::brain::context::PatternContext;
use crate::brain::intent::Intent;
use crate::brain::text;
use crate::error::PatternError;

static META: PatternMeta = PatternMeta {
    id: "conciseness-filter",
    name: "Conciseness Filter",
    description: "Removes pleasantries, hedging and filler phrases",
    applicable_intents: &Intent::ALL,
    mode: PatternMode::Both,
    priority: 10,
    run_after: &[],
    config_schema: &[],
};

/// Phrases removed outright. Longer phrases come first so the alternation
/// prefers them over their prefixes.
const FILLER: &[&str] = &[
    "it would be great if you could",
    "i was wondering if you could",
    "i was wondering if",
    "if you don't mind",
    "would you mind",
    "i would like you to",
    "i want you to",
    "thanks in advance",
    "i appreciate it",
    "if possible",
    "if you can",
    "thank you",
    "could you",
    "can you",
    "would you",
    "help me",
    "kind of",
    "sort of",
    "i think",
    "i guess",
    "basically",
    "actually",
    "perhaps",
    "please",
    "kindly",
    "really",
    "thanks",
    "maybe",
    "just",
    "hello",
    "hey",
    "hi",
];

/// Wordy phrases and their short form
const REWRITES: &[(&str, &str)] = &[
    ("due to the fact that", "because"),
    ("at this point in time", "now"),
    ("for the purpose of", "for"),
    ("in the event that", "if"),
    ("in order to", "to"),
    ("make sure that", "ensure that"),
    ("is able to", "can"),
    ("a lot of", "many"),
];

static FILLER_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = FILLER.iter().map(|p| regex::escape(p)).collect::<Vec<_>>().join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b[,!]?", alternation)).expect("Invalid regex: filler phrases")
});

static REWRITE_RES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    REWRITES
        .iter()
        .map(|(from, to)| {
            let re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(from))).expect("Invalid regex: wordy phrase");
            (re, *to)
        })
        .collect()
});

/// Spaces left in front of punctuation after a removal
static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" +([,.;:!?])").expect("Invalid regex: space before punctuation"));

/// A comma stranded in front of closing punctuation
static DANGLING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",+([.;:!?])").expect("Invalid regex: dangling comma"));

#[derive(Debug, Clone, Copy, Default)]
pub struct ConcisenessFilter;

impl ConcisenessFilter {
    fn tidy_line(line: &str) -> String {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        let spaced = SPACE_BEFORE_PUNCT.replace_all(&collapsed, "$1");
        let spaced = DANGLING_COMMA.replace_all(&spaced, "$1");
        let trimmed = spaced
            .trim_end_matches(',')
            .trim_start_matches(|c: char| matches!(c, ',' | ';' | ':' | '!' | '.') || c.is_whitespace());
        text::capitalize_first(trimmed)
    }
}

impl Pattern for ConcisenessFilter {
    fn meta(&self) -> &'static PatternMeta {
        &META
    }

    fn apply(
        &self,
        prompt: &str,
        _ctx: &PatternContext,
        _settings: &PatternSettings,
    ) -> Result<PatternResult, PatternError> {
        let dimension = ImprovementDimension::Efficiency;

        let mut removals = 0;
        let mut rewrites = 0;
        let rewritten = text::rewrite_prose(prompt, |line| {
            removals += FILLER_RE.find_iter(line).count();
            let mut working = FILLER_RE.replace_all(line, "").into_owned();
            for (re, replacement) in REWRITE_RES.iter() {
                rewrites += re.find_iter(&working).count();
                working = re.replace_all(&working, *replacement).into_owned();
            }
            if working == line {
                return Some(working);
            }
            let tidy = Self::tidy_line(&working);
            let emptied = !line.trim().is_empty() && tidy.chars().all(|c| !c.is_alphanumeric());
            (!emptied).then_some(tidy)
        });
        if removals + rewrites == 0 {
            return Ok(PatternResult::unchanged(prompt, dimension, "Prompt is already concise"));
        }

        let enhanced = rewritten.trim().to_string();

        if enhanced.is_empty() {
            return Ok(PatternResult::unchanged(prompt, dimension, "Nothing left after removing filler"));
        }
        if enhanced == prompt {
            return Ok(PatternResult::unchanged(prompt, dimension, "Prompt is already concise"));
        }

        let findings = removals + rewrites;
        Ok(PatternResult::applied(
            enhanced,
            dimension,
            format!("Removed {} filler phrase(s) and {} wordy construction(s)", removals, rewrites),
            Impact::from_count(findings),
        ))
    }
}
