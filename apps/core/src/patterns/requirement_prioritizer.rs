//! Sorts the stated requirements into must, should and could have.

use super::{Impact, ImprovementDimension, Pattern, PatternMeta, PatternMode, PatternResult, PatternSettings, SettingSpec};
use crate::brain::context::PatternContext;
use crate::brain::intent::Intent;
use crate::brain::{signals, text};
use crate::error::PatternError;

static META: PatternMeta = PatternMeta {
    id: "requirement-prioritizer",
    name: "Requirement Prioritizer",
    description: "Groups stated requirements by priority (MoSCoW)",
    applicable_intents: &[Intent::Planning, Intent::PrdGeneration, Intent::CodeGeneration],
    mode: PatternMode::Deep,
    priority: 3,
    run_after: &[],
    config_schema: &[SettingSpec {
        key: "maxRequirements",
        description: "Maximum number of requirements ranked",
        default: 10,
    }],
};

const HEADING: &str = "Prioritized Requirements";
const PRIORITIZED_PHRASES: &[&str] = &["must have", "must-have", "nice to have", "nice-to-have", "moscow", "p0", "p1"];

/// Ranking one requirement is pointless
const MIN_REQUIREMENTS: usize = 2;

const REQUIREMENT_MARKERS: &[&str] = &[
    "must", "should", "need", "needs", "required", "support", "supports", "allow", "allows",
    "include", "includes", "could", "optional", "ideally",
];
const MUST_MARKERS: &[&str] = &["must", "required", "need", "needs", "critical", "essential", "has to", "have to"];
const COULD_MARKERS: &[&str] = &["could", "optional", "ideally", "if time", "bonus", "nice", "later"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Priority {
    Must,
    Should,
    Could,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RequirementPrioritizer;

impl RequirementPrioritizer {
    fn requirements(prompt: &str) -> Vec<String> {
        let mut found = Vec::new();
        for sentence in text::sentences(prompt) {
            let line = text::strip_list_marker(&sentence);
            if line.starts_with('#') {
                continue;
            }
            let lower = line.to_lowercase();
            if text::contains_any(&lower, REQUIREMENT_MARKERS) || signals::leading_action_verb(line).is_some() {
                let cleaned = text::capitalize_first(text::strip_terminal_punctuation(line));
                super::push_unique(&mut found, &cleaned);
            }
        }
        found
    }

    fn rank(requirement: &str) -> Priority {
        let lower = requirement.to_lowercase();
        if text::contains_any(&lower, COULD_MARKERS) {
            Priority::Could
        } else if text::contains_any(&lower, MUST_MARKERS) {
            Priority::Must
        } else {
            Priority::Should
        }
    }
}

impl Pattern for RequirementPrioritizer {
    fn meta(&self) -> &'static PatternMeta {
        &META
    }

    fn apply(
        &self,
        prompt: &str,
        ctx: &PatternContext,
        settings: &PatternSettings,
    ) -> Result<PatternResult, PatternError> {
        let dimension = ImprovementDimension::Structure;

        let lower = ctx.original_prompt.to_lowercase();
        if text::has_section(prompt, HEADING) || text::contains_any(&lower, PRIORITIZED_PHRASES) {
            return Ok(PatternResult::unchanged(prompt, dimension, "Requirements already prioritized"));
        }

        let requirements = text::cap(
            Self::requirements(&ctx.original_prompt),
            super::setting(&META, settings, "maxRequirements"),
        );
        if requirements.len() < MIN_REQUIREMENTS {
            return Ok(PatternResult::unchanged(prompt, dimension, "Too few requirements to prioritize"));
        }

        let mut block = format!("## {}", HEADING);
        for (label, priority) in [
            ("Must have", Priority::Must),
            ("Should have", Priority::Should),
            ("Could have", Priority::Could),
        ] {
            let group: Vec<&String> = requirements.iter().filter(|r| Self::rank(r) == priority).collect();
            if group.is_empty() {
                continue;
            }
            block.push_str(&format!("\n\n**{}**\n", label));
            for requirement in group {
                block.push_str(&format!("\n- {}", requirement));
            }
        }

        Ok(PatternResult::applied(
            text::append_block(prompt, &block),
            dimension,
            format!("Prioritized {} requirement(s)", requirements.len()),
            Impact::from_count(requirements.len()),
        ))
    }
}
