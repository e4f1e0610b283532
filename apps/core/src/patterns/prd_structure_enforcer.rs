//! Outlines the sections a product requirements document needs.

use super::{Impact, ImprovementDimension, Pattern, PatternMeta, PatternMode, PatternResult, PatternSettings};
use crate::brain::context::PatternContext;
use crate::brain::intent::Intent;
use crate::brain::text;
use crate::error::PatternError;

static META: PatternMeta = PatternMeta {
    id: "prd-structure-enforcer",
    name: "PRD Structure Enforcer",
    description: "Lists the standard PRD sections the request does not cover yet",
    applicable_intents: &[Intent::PrdGeneration],
    mode: PatternMode::Both,
    priority: 9,
    run_after: &[],
    config_schema: &[],
};

const OUTLINE_HEADING: &str = "PRD Outline";

/// (section name, what it should contain)
const PRD_SECTIONS: &[(&str, &str)] = &[
    ("Problem Statement", "the user problem and why it matters now"),
    ("Goals", "measurable outcomes this release must reach"),
    ("Target Users", "who the product serves and their main job to be done"),
    ("Features", "user-facing capabilities, each tied to a goal"),
    ("Non-Goals", "what this release deliberately leaves out"),
    ("Success Metrics", "how success is measured after launch"),
    ("Timeline", "milestones and the order of delivery"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct PrdStructureEnforcer;

impl Pattern for PrdStructureEnforcer {
    fn meta(&self) -> &'static PatternMeta {
        &META
    }

    fn apply(
        &self,
        prompt: &str,
        _ctx: &PatternContext,
        _settings: &PatternSettings,
    ) -> Result<PatternResult, PatternError> {
        let dimension = ImprovementDimension::Structure;

        if text::has_section(prompt, OUTLINE_HEADING) {
            return Ok(PatternResult::unchanged(prompt, dimension, "PRD outline already present"));
        }

        let missing: Vec<String> = PRD_SECTIONS
            .iter()
            .filter(|(name, _)| !text::has_section(prompt, name))
            .map(|(name, hint)| format!("{}: {}", name, hint))
            .collect();
        if missing.is_empty() {
            return Ok(PatternResult::unchanged(prompt, dimension, "Every PRD section is present"));
        }

        let block = text::render_section(OUTLINE_HEADING, &missing);
        Ok(PatternResult::applied(
            text::append_block(prompt, &block),
            dimension,
            format!("Outlined {} missing PRD section(s)", missing.len()),
            Impact::from_count(missing.len()),
        ))
    }
}
