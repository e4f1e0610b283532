//! CLEAR quality scoring.
//!
//! Scores a prompt on Conciseness, Logic and Explicitness (plus Adaptiveness and
//! Reflectiveness in deep mode). Every dimension is an integer between 0 and 100,
//! computed from keyword and structural heuristics only. Scoring is total: any
//! string, including the empty one, yields a well-defined score.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::context::Mode;
use super::text;

/// Verbose or hedging phrases that add words without adding meaning
pub const VERBOSITY_MARKERS: &[&str] = &[
    "maybe", "perhaps", "basically", "actually", "really", "just", "kind of", "sort of",
    "i think", "i guess", "in order to", "a little bit", "help me", "i was wondering",
    "i would like", "i want you to", "at the end of the day", "for all intents and purposes",
    "it would be great", "somehow",
];

/// Social niceties that an agent does not need
pub const PLEASANTRIES: &[&str] = &[
    "please", "could you", "can you", "would you", "if possible", "if you can",
    "if you don't mind", "would you mind", "thank you", "thanks", "kindly", "i appreciate",
    "hi", "hello", "hey",
];

pub const SEQUENCING_MARKERS: &[&str] = &[
    "first", "firstly", "second", "then", "next", "finally", "lastly", "after that",
    "afterwards", "followed by", "step 1", "step one", "before that",
];

/// Pairs of requirements that pull in opposite directions
pub const CONTRADICTIONS: &[(&str, &str)] = &[
    ("simple", "comprehensive"),
    ("quick", "thorough"),
    ("minimal", "full-featured"),
    ("minimal", "feature-rich"),
    ("short", "detailed"),
    ("brief", "in-depth"),
    ("lightweight", "enterprise-grade"),
];

pub const PERSONA_MARKERS: &[&str] = &[
    "you are", "act as", "acting as", "as a senior", "as an expert", "as an experienced",
    "role:", "persona:", "senior", "expert",
];

pub const FORMAT_MARKERS: &[&str] = &[
    "format", "output", "return", "respond with", "json", "markdown", "table", "yaml", "csv",
    "bullet", "list of", "diff", "code block",
];

pub const TONE_MARKERS: &[&str] = &[
    "tone", "style", "formal", "informal", "concise", "friendly", "professional", "casual",
    "voice",
];

pub const SUCCESS_MARKERS: &[&str] = &[
    "success criteria", "acceptance criteria", "must", "should", "done when", "expected",
    "requirement", "requirements", "criteria", "so that",
];

pub const EXAMPLE_MARKERS: &[&str] = &[
    "example", "examples", "e.g.", "for instance", "such as", "like this", "sample",
];

pub const ALTERNATIVE_MARKERS: &[&str] = &[
    "alternative", "alternatives", "alternatively", "option", "options", "approach",
    "approaches", "trade-off", "trade-offs", "tradeoff", "fallback", "otherwise", "instead",
    "either", "consider", "if not",
];

pub const REFLECTION_MARKERS: &[&str] = &[
    "verify", "validate", "review", "double-check", "check that", "test", "tests", "ensure",
    "confirm", "reflect", "self-check", "sanity check",
];

const PERSONA_WEIGHT: u8 = 25;
const FORMAT_WEIGHT: u8 = 25;
const TONE_WEIGHT: u8 = 15;
const SUCCESS_WEIGHT: u8 = 20;
const EXAMPLE_WEIGHT: u8 = 15;

/// A named CLEAR axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Conciseness,
    Logic,
    Explicitness,
    Adaptiveness,
    Reflectiveness,
}

impl Dimension {
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Conciseness => "conciseness",
            Dimension::Logic => "logic",
            Dimension::Explicitness => "explicitness",
            Dimension::Adaptiveness => "adaptiveness",
            Dimension::Reflectiveness => "reflectiveness",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Threshold band of the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
    Excellent,
    Good,
    NeedsImprovement,
    Poor,
}

impl Rating {
    pub fn from_overall(overall: u8) -> Self {
        match overall {
            80..=u8::MAX => Rating::Excellent,
            60..=79 => Rating::Good,
            40..=59 => Rating::NeedsImprovement,
            _ => Rating::Poor,
        }
    }
}

/// CLEAR scores of one prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityScore {
    pub conciseness: u8,
    pub logic: u8,
    pub explicitness: u8,
    /// Deep mode only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adaptiveness: Option<u8>,
    /// Deep mode only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reflectiveness: Option<u8>,
    pub overall: u8,
    pub rating: Rating,
}

impl QualityScore {
    /// All-zero score, used for empty input
    pub fn zero(mode: Mode) -> Self {
        let deep = (mode == Mode::Deep).then_some(0);
        Self {
            conciseness: 0,
            logic: 0,
            explicitness: 0,
            adaptiveness: deep,
            reflectiveness: deep,
            overall: 0,
            rating: Rating::Poor,
        }
    }

    /// Scored dimensions, in CLEAR order
    pub fn dimensions(&self) -> Vec<(Dimension, u8)> {
        let mut dims = vec![
            (Dimension::Conciseness, self.conciseness),
            (Dimension::Logic, self.logic),
            (Dimension::Explicitness, self.explicitness),
        ];
        if let Some(a) = self.adaptiveness {
            dims.push((Dimension::Adaptiveness, a));
        }
        if let Some(r) = self.reflectiveness {
            dims.push((Dimension::Reflectiveness, r));
        }
        dims
    }

    pub fn get(&self, dimension: Dimension) -> Option<u8> {
        match dimension {
            Dimension::Conciseness => Some(self.conciseness),
            Dimension::Logic => Some(self.logic),
            Dimension::Explicitness => Some(self.explicitness),
            Dimension::Adaptiveness => self.adaptiveness,
            Dimension::Reflectiveness => self.reflectiveness,
        }
    }
}

/// CLEAR scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityScorer;

impl QualityScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score every dimension of the prompt for the given mode
    pub fn score(&self, prompt: &str, mode: Mode) -> QualityScore {
        if prompt.trim().is_empty() {
            return QualityScore::zero(mode);
        }

        let lower = prompt.to_lowercase();
        let conciseness = self.conciseness(prompt);
        let logic = self.logic(prompt);
        let explicitness = self.explicitness(prompt);

        let (adaptiveness, reflectiveness, overall) = match mode {
            Mode::Fast => {
                let overall = 0.35 * f32::from(conciseness)
                    + 0.30 * f32::from(logic)
                    + 0.35 * f32::from(explicitness);
                (None, None, overall)
            }
            Mode::Deep => {
                let a = marker_score(text::count_distinct(&lower, ALTERNATIVE_MARKERS));
                let r = marker_score(text::count_distinct(&lower, REFLECTION_MARKERS));
                let overall = 0.20 * f32::from(conciseness)
                    + 0.20 * f32::from(logic)
                    + 0.30 * f32::from(explicitness)
                    + 0.15 * f32::from(a)
                    + 0.15 * f32::from(r);
                (Some(a), Some(r), overall)
            }
        };

        let overall = clamp_score(overall);
        QualityScore {
            conciseness,
            logic,
            explicitness,
            adaptiveness,
            reflectiveness,
            overall,
            rating: Rating::from_overall(overall),
        }
    }

    /// Verbosity, pleasantries and signal-to-noise ratio
    pub fn conciseness(&self, prompt: &str) -> u8 {
        let total = text::word_count(prompt);
        if total == 0 {
            return 0;
        }
        let lower = prompt.to_lowercase();

        let verbosity: usize = VERBOSITY_MARKERS.iter().map(|m| text::count_phrase(&lower, m)).sum();
        let pleasantries: usize = PLEASANTRIES.iter().map(|m| text::count_phrase(&lower, m)).sum();
        let snr = text::content_word_count(prompt) as f32 / total as f32;

        let mut score = 100.0;
        score -= (verbosity as f32 * 10.0).min(40.0);
        score -= (pleasantries as f32 * 8.0).min(32.0);
        score -= ((0.5 - snr).max(0.0) * 80.0).round();
        if total > 300 {
            score -= 10.0;
        }
        clamp_score(score)
    }

    /// Sequencing, structure, fragmentation and contradictions
    pub fn logic(&self, prompt: &str) -> u8 {
        if text::word_count(prompt) == 0 {
            return 0;
        }
        let lower = prompt.to_lowercase();
        let sentences = text::sentences(prompt);

        let sequenced = text::contains_any(&lower, SEQUENCING_MARKERS)
            || prompt.lines().any(|l| {
                let l = l.trim_start();
                l.chars().next().is_some_and(|c| c.is_ascii_digit()) && l.contains(". ")
            });
        let structured = text::has_markdown_structure(prompt);

        let short = sentences.iter().filter(|s| text::word_count(s) <= 4).count();
        let fragmented = sentences.len() >= 3 && short * 2 > sentences.len() && !sequenced;

        let contradictions = CONTRADICTIONS
            .iter()
            .filter(|(a, b)| text::contains_phrase(&lower, a) && text::contains_phrase(&lower, b))
            .count();

        let mut score: f32 = 75.0;
        if sequenced {
            score += 10.0;
        }
        if structured {
            score += 10.0;
        }
        if fragmented {
            score -= 30.0;
        }
        score -= (contradictions as f32 * 15.0).min(30.0);
        clamp_score(score)
    }

    /// Weighted presence checks for persona, format, tone, success criteria and examples
    pub fn explicitness(&self, prompt: &str) -> u8 {
        let lower = prompt.to_lowercase();
        let mut score: u8 = 0;
        if text::contains_any(&lower, PERSONA_MARKERS) {
            score += PERSONA_WEIGHT;
        }
        if text::contains_any(&lower, FORMAT_MARKERS) {
            score += FORMAT_WEIGHT;
        }
        if text::contains_any(&lower, TONE_MARKERS) {
            score += TONE_WEIGHT;
        }
        if text::contains_any(&lower, SUCCESS_MARKERS) {
            score += SUCCESS_WEIGHT;
        }
        if text::contains_any(&lower, EXAMPLE_MARKERS) || prompt.contains("```") {
            score += EXAMPLE_WEIGHT;
        }
        score.min(100)
    }

    /// Overall difference between two scores, positive when `after` is better
    pub fn score_delta(before: &QualityScore, after: &QualityScore) -> i16 {
        i16::from(after.overall) - i16::from(before.overall)
    }
}

fn marker_score(markers: usize) -> u8 {
    if markers == 0 {
        0
    } else {
        clamp_score(40.0 + 20.0 * markers as f32)
    }
}

fn clamp_score(value: f32) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}
