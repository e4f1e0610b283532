//! Groups loose sentences into Requirements, Constraints and Context sections.

use super::{Impact, ImprovementDimension, Pattern, PatternMeta, PatternMode, PatternResult, PatternSettings};
use crate::brain::context::PatternContext;
use crate::brain::intent::Intent;
use crate::brain::{signals, text};
use crate::error::PatternError;

static META: PatternMeta = PatternMeta {
    id: "structure-organizer",
    name: "Structure Organizer",
    description: "Sorts loose sentences into requirements, constraints and context",
    applicable_intents: &Intent::ALL,
    mode: PatternMode::Both,
    priority: 7,
    run_after: &["conciseness-filter"],
    config_schema: &[],
};

/// Fewer sentences than this read fine without headings
const MIN_SENTENCES: usize = 3;

const CONSTRAINT_MARKERS: &[&str] = &[
    "don't", "do not", "avoid", "without", "never", "must not", "should not", "only",
    "no more than", "at most", "limit", "limited to", "cannot", "can't",
];

const REQUIREMENT_MARKERS: &[&str] = &[
    "must", "should", "need", "needs", "require", "requires", "has to", "have to", "ensure",
    "support", "supports", "include", "allow", "allows", "handle",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Requirement,
    Constraint,
    Context,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StructureOrganizer;

impl StructureOrganizer {
    /// Split off a leading `# Objective` block written by the objective clarifier
    fn split_objective(prompt: &str) -> (Option<String>, &str) {
        let body = prompt.trim();
        if !body.to_lowercase().starts_with("# objective") {
            return (None, body);
        }
        let mut parts = body.splitn(3, "\n\n");
        match (parts.next(), parts.next()) {
            (Some(heading), Some(objective)) => {
                let rest = parts.next().unwrap_or("").trim();
                (Some(format!("{}\n\n{}", heading, objective)), rest)
            }
            _ => (Some(body.to_string()), ""),
        }
    }

    /// Split the body into the user's own text and the `## ` sections that
    /// earlier patterns appended after it
    fn split_appended(body: &str) -> (&str, &str) {
        if body.starts_with("## ") {
            return ("", body);
        }
        match body.find("\n## ") {
            Some(pos) => (body[..pos].trim_end(), &body[pos + 1..]),
            None => (body, ""),
        }
    }

    fn classify(sentence: &str) -> Group {
        let lower = sentence.to_lowercase();
        if text::contains_any(&lower, CONSTRAINT_MARKERS) {
            Group::Constraint
        } else if text::contains_any(&lower, REQUIREMENT_MARKERS)
            || signals::leading_action_verb(sentence).is_some()
        {
            Group::Requirement
        } else {
            Group::Context
        }
    }
}

impl Pattern for StructureOrganizer {
    fn meta(&self) -> &'static PatternMeta {
        &META
    }

    fn apply(
        &self,
        prompt: &str,
        ctx: &PatternContext,
        _settings: &PatternSettings,
    ) -> Result<PatternResult, PatternError> {
        let dimension = ImprovementDimension::Structure;

        // structure the user wrote counts, sections added by other patterns do not
        let (_, original_body) = Self::split_objective(&ctx.original_prompt);
        if text::has_markdown_structure(original_body) {
            return Ok(PatternResult::unchanged(prompt, dimension, "Prompt is already structured"));
        }
        let (head, body) = Self::split_objective(prompt);
        let (own, appended) = Self::split_appended(body);
        if text::has_markdown_structure(own) {
            return Ok(PatternResult::unchanged(prompt, dimension, "Prompt is already structured"));
        }
        if text::has_code_fence(own) {
            return Ok(PatternResult::unchanged(prompt, dimension, "Code blocks are kept as written"));
        }
        let sentences = text::sentences(own);
        if sentences.len() < MIN_SENTENCES {
            return Ok(PatternResult::unchanged(prompt, dimension, "Too short to need structure"));
        }

        let mut sections: Vec<(&str, Vec<String>)> = vec![
            ("Requirements", Vec::new()),
            ("Constraints", Vec::new()),
            ("Context", Vec::new()),
        ];
        for sentence in sentences {
            let slot = match Self::classify(&sentence) {
                Group::Requirement => 0,
                Group::Constraint => 1,
                Group::Context => 2,
            };
            sections[slot].1.push(sentence);
        }

        let blocks: Vec<String> = sections
            .iter()
            .filter(|(_, items)| !items.is_empty())
            .map(|(heading, items)| text::render_section(heading, items))
            .collect();
        let organized = blocks.join("\n\n");
        let enhanced = match head {
            Some(head) => text::append_block(&head, &organized),
            None => organized,
        };
        let enhanced = if appended.is_empty() {
            enhanced
        } else {
            text::append_block(&enhanced, appended)
        };

        // one group is a relabel, three is a full reorganisation
        let impact = match blocks.len() {
            0..=1 => Impact::Low,
            2 => Impact::Medium,
            _ => Impact::High,
        };
        Ok(PatternResult::applied(
            enhanced,
            dimension,
            format!("Organized the prompt into {} section(s)", blocks.len()),
            impact,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::context::Mode;
    use crate::brain::intent::IntentResult;

    fn run_from(original: &str, prompt: &str) -> PatternResult {
        let ctx = PatternContext::new(Mode::Fast, original, IntentResult::supplied(Intent::CodeGeneration, original));
        StructureOrganizer.apply(prompt, &ctx, &PatternSettings::default()).unwrap()
    }

    fn run(prompt: &str) -> PatternResult {
        run_from(prompt, prompt)
    }

    #[test]
    fn test_groups_sentences() {
        let result = run(
            "Build a signup form. It must validate emails. Do not use jQuery. Our users are mostly on mobile.",
        );
        assert!(result.applied);
        assert_eq!(
            result.enhanced_prompt,
            "## Requirements\n\n- Build a signup form.\n- It must validate emails.\n\n\
             ## Constraints\n\n- Do not use jQuery.\n\n\
             ## Context\n\n- Our users are mostly on mobile."
        );
        assert_eq!(result.improvement.impact, Impact::High);
    }

    #[test]
    fn test_keeps_objective_block_on_top() {
        let result = run("# Objective\n\nBuild a signup form\n\nIt must validate emails. Avoid popups. Users are on mobile.");
        assert!(result.applied);
        assert!(result.enhanced_prompt.starts_with("# Objective\n\nBuild a signup form\n\n## Requirements"));
    }

    #[test]
    fn test_short_or_structured_prompts_untouched() {
        assert!(!run("Create a login page").applied);
        assert!(!run("# Objective\n\nCreate a login page").applied);
        assert!(!run("Steps:\n- one\n- two\n- three").applied);
    }

    #[test]
    fn test_sections_added_by_earlier_patterns_stay_below() {
        let original = "Build a signup form. It must validate emails. Do not use jQuery.";
        let current = "# Objective\n\nBuild a signup form.\n\nIt must validate emails. Do not use jQuery. Keep it small.\n\n\
                       ## Technical Context\n\n- Which framework?";
        let result = run_from(original, current);
        assert!(result.applied);
        assert_eq!(
            result.enhanced_prompt,
            "# Objective\n\nBuild a signup form.\n\n\
             ## Requirements\n\n- It must validate emails.\n\n\
             ## Constraints\n\n- Do not use jQuery.\n\n\
             ## Context\n\n- Keep it small.\n\n\
             ## Technical Context\n\n- Which framework?"
        );
    }

    #[test]
    fn test_code_blocks_are_not_split_into_bullets() {
        let prompt = "Refactor this. It is slow. Keep the API.\n```\nlet a = 1;\nlet b = 2;\n```";
        assert!(!run(prompt).applied);
    }

    #[test]
    fn test_user_structure_in_original_is_respected() {
        let original = "Steps:\n- one\n- two";
        assert!(!run_from(original, "One thing. Another thing. A third thing.").applied);
    }

    #[test]
    fn test_second_pass_is_noop() {
        let first = run("Build a form. Use React. The app is old. Keep it small.");
        assert!(first.applied);
        assert!(!run(&first.enhanced_prompt).applied);
    }
}
