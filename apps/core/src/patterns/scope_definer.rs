//! Draws the line between what the request covers and what it does not.

use super::{Impact, ImprovementDimension, Pattern, PatternMeta, PatternMode, PatternResult, PatternSettings, SettingSpec};
use crate::brain::context::PatternContext;
use crate::brain::intent::{Intent, IntentTable};
use crate::brain::{signals, text};
use crate::error::PatternError;

static META: PatternMeta = PatternMeta {
    id: "scope-definer",
    name: "Scope Definer",
    description: "Adds explicit in-scope and out-of-scope lists",
    applicable_intents: &[
        Intent::CodeGeneration,
        Intent::Planning,
        Intent::Migration,
        Intent::PrdGeneration,
    ],
    mode: PatternMode::Deep,
    priority: 7,
    run_after: &[],
    config_schema: &[SettingSpec {
        key: "maxItems",
        description: "Maximum number of entries per list",
        default: 6,
    }],
};

const HEADING: &str = "Scope";
const SCOPE_SECTIONS: &[&str] = &["scope", "out of scope", "in scope", "non-goals"];

const OUT_OF_SCOPE: IntentTable<&[&str]> = IntentTable {
    code_generation: &[
        "Deployment and infrastructure changes",
        "Refactoring unrelated code",
        "Features not named in this request",
    ],
    planning: &[
        "Implementation details below the level of a milestone",
        "Budget and staffing decisions",
    ],
    refinement: &[],
    debugging: &[],
    documentation: &[],
    testing: &[],
    migration: &[
        "New features during the migration",
        "Behaviour changes the target version does not require",
    ],
    security_review: &[],
    learning: &[],
    summarization: &[],
    prd_generation: &["Technical design and architecture", "Marketing and launch plan"],
};

#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeDefiner;

impl ScopeDefiner {
    /// Sentences or list items that open with an action verb
    fn deliverables(prompt: &str) -> Vec<String> {
        text::sentences(prompt)
            .iter()
            .map(|s| text::strip_list_marker(s))
            .filter(|s| signals::leading_action_verb(s).is_some())
            .map(|s| text::capitalize_first(text::strip_terminal_punctuation(s)))
            .collect()
    }
}

impl Pattern for ScopeDefiner {
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

        if super::has_any_section(prompt, SCOPE_SECTIONS) {
            return Ok(PatternResult::unchanged(prompt, dimension, "Scope already defined"));
        }

        let max = super::setting(&META, settings, "maxItems");
        let mut in_scope = Vec::new();
        for item in Self::deliverables(&ctx.original_prompt) {
            super::push_unique(&mut in_scope, &item);
        }
        if in_scope.is_empty() && !ctx.original_prompt.trim().is_empty() {
            in_scope.push("The request exactly as stated above".to_string());
        }
        let in_scope = text::cap(in_scope, max);
        let out_of_scope: Vec<String> = OUT_OF_SCOPE
            .get(ctx.intent.primary_intent)
            .iter()
            .take(max)
            .map(|s| s.to_string())
            .collect();

        if in_scope.is_empty() && out_of_scope.is_empty() {
            return Ok(PatternResult::unchanged(prompt, dimension, "Nothing to scope"));
        }

        let mut block = format!("## {}", HEADING);
        for (label, items) in [("In scope", &in_scope), ("Out of scope", &out_of_scope)] {
            if items.is_empty() {
                continue;
            }
            block.push_str(&format!("\n\n**{}**\n", label));
            for item in items {
                block.push_str(&format!("\n- {}", item));
            }
        }

        let findings = in_scope.len() + out_of_scope.len();
        Ok(PatternResult::applied(
            text::append_block(prompt, &block),
            dimension,
            format!(
                "Defined scope: {} in, {} out",
                in_scope.len(),
                out_of_scope.len()
            ),
            Impact::from_count(findings),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::context::Mode;
    use crate::brain::intent::IntentResult;

    fn run(prompt: &str, intent: Intent) -> PatternResult {
        let ctx = PatternContext::new(Mode::Deep, prompt, IntentResult::supplied(intent, prompt));
        ScopeDefiner.apply(prompt, &ctx, &PatternSettings::default()).unwrap()
    }

    #[test]
    fn test_lists_deliverables_and_exclusions() {
        let result = run("Build a signup form. Add email verification.", Intent::CodeGeneration);
        assert!(result.applied);
        assert!(result.enhanced_prompt.contains(
            "## Scope\n\n**In scope**\n\n- Build a signup form\n- Add email verification\n\n**Out of scope**\n"
        ));
        assert!(result.enhanced_prompt.contains("- Deployment and infrastructure changes"));
        assert_eq!(result.improvement.impact, Impact::High);
    }

    #[test]
    fn test_existing_scope_short_circuits() {
        let prompt = "Migrate to Vue 3.\nOut of scope: new features";
        assert!(!run(prompt, Intent::Migration).applied);
    }

    #[test]
    fn test_fallback_in_scope_item() {
        let result = run("A roadmap for the mobile app", Intent::Planning);
        assert!(result.enhanced_prompt.contains("- The request exactly as stated above"));
    }
}
