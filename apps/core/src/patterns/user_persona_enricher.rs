//! Names the people the product is for.

use super::{Impact, ImprovementDimension, Pattern, PatternMeta, PatternMode, PatternResult, PatternSettings, SettingSpec};
use crate::brain::context::PatternContext;
use crate::brain::intent::Intent;
use crate::brain::text;
use crate::error::PatternError;

static META: PatternMeta = PatternMeta {
    id: "user-persona-enricher",
    name: "User Persona Enricher",
    description: "Adds a Target Users section with personas and their goals",
    applicable_intents: &[Intent::PrdGeneration, Intent::Planning],
    mode: PatternMode::Deep,
    priority: 4,
    run_after: &[],
    config_schema: &[SettingSpec {
        key: "maxPersonas",
        description: "Maximum number of personas",
        default: 4,
    }],
};

const HEADING: &str = "Target Users";
const EXISTING_SECTIONS: &[&str] = &["target users", "personas", "user personas", "audience"];

const PERSONAS: &[(&[&str], &str)] = &[
    (&["admin", "admins", "administrator", "back office"], "Administrators: manage accounts and settings with minimal effort"),
    (&["customer", "customers", "shopper", "buyer", "buyers"], "Customers: find and buy what they need quickly"),
    (&["developer", "developers", "engineer", "engineers", "sdk"], "Developers: integrate through a documented API"),
    (&["student", "students", "learner", "learners", "teacher", "teachers"], "Learners and instructors: track progress and share material"),
    (&["team", "teams", "manager", "managers", "enterprise"], "Team leads: coordinate work and see status at a glance"),
    (&["mobile", "phone", "ios", "android"], "Mobile users: complete the main task on a small screen"),
    (&["patient", "patients", "clinic", "doctor"], "Patients and clinicians: exchange information safely"),
];

const FALLBACK_PERSONA: &str = "Primary user: describe the role, the goal and the main frustration";

#[derive(Debug, Clone, Copy, Default)]
pub struct UserPersonaEnricher;

impl Pattern for UserPersonaEnricher {
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

        if super::has_any_section(prompt, EXISTING_SECTIONS) {
            return Ok(PatternResult::unchanged(prompt, dimension, "Target users already described"));
        }
        if ctx.original_prompt.trim().is_empty() {
            return Ok(PatternResult::unchanged(prompt, dimension, "No product to describe users for"));
        }

        let lower = ctx.original_prompt.to_lowercase();
        let mut personas: Vec<String> = PERSONAS
            .iter()
            .filter(|(triggers, _)| text::contains_any(&lower, triggers))
            .map(|(_, persona)| persona.to_string())
            .collect();
        if personas.is_empty() {
            personas.push(FALLBACK_PERSONA.to_string());
        }

        let personas = text::cap(personas, super::setting(&META, settings, "maxPersonas"));
        if personas.is_empty() {
            return Ok(PatternResult::unchanged(prompt, dimension, "Personas capped to nothing"));
        }

        let block = text::render_section(HEADING, &personas);
        Ok(PatternResult::applied(
            text::append_block(prompt, &block),
            dimension,
            format!("Described {} target user group(s)", personas.len()),
            Impact::from_count(personas.len()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::context::Mode;
    use crate::brain::intent::IntentResult;

    fn run(prompt: &str) -> PatternResult {
        let ctx = PatternContext::new(Mode::Deep, prompt, IntentResult::supplied(Intent::PrdGeneration, prompt));
        UserPersonaEnricher.apply(prompt, &ctx, &PatternSettings::default()).unwrap()
    }

    #[test]
    fn test_personas_from_request() {
        let result = run("Write a PRD for a mobile shop where customers reorder groceries and admins manage stock");
        assert!(result.applied);
        assert!(result.enhanced_prompt.contains("## Target Users\n\n- Administrators"));
        assert!(result.enhanced_prompt.contains("- Customers: "));
        assert!(result.enhanced_prompt.contains("- Mobile users: "));
    }

    #[test]
    fn test_fallback_persona() {
        let result = run("Write a PRD for a habit tracker");
        assert!(result.enhanced_prompt.ends_with(FALLBACK_PERSONA));
        assert_eq!(result.improvement.impact, Impact::Low);
    }

    #[test]
    fn test_second_pass_is_noop() {
        let first = run("Write a PRD for a habit tracker");
        assert!(!run(&first.enhanced_prompt).applied);
    }
}
