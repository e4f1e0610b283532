//! Turns vague terms into questions the requester should answer.

use super::{Impact, ImprovementDimension, Pattern, PatternMeta, PatternMode, PatternResult, PatternSettings, SettingSpec};
use crate::brain::context::PatternContext;
use crate::brain::intent::{Intent, IntentTable};
use crate::brain::text;
use crate::error::PatternError;

static META: PatternMeta = PatternMeta {
    id: "ambiguity-detector",
    name: "Ambiguity Detector",
    description: "Lists questions for vague or underspecified terms",
    applicable_intents: &Intent::ALL,
    mode: PatternMode::Deep,
    priority: 6,
    run_after: &[],
    config_schema: &[SettingSpec {
        key: "maxAmbiguities",
        description: "Maximum number of questions",
        default: 6,
    }],
};

const HEADING: &str = "Ambiguities to Resolve";

/// Vague terms and the question that pins them down
const VAGUE_TERMS: &[(&[&str], &str)] = &[
    (&["fast", "quickly", "performant", "efficient"], "What response time or throughput counts as fast enough?"),
    (&["scalable", "scale"], "What load must it handle: users, requests per second, data size?"),
    (&["secure", "safe"], "Which threats or compliance requirements matter?"),
    (&["simple", "easy"], "Simple for whom: end users, maintainers, or both?"),
    (&["modern"], "Which conventions or design system define modern here?"),
    (&["nice", "beautiful", "pretty", "clean"], "Which visual or code style should it follow?"),
    (&["better", "improve", "improved"], "Better by which measurable criterion?"),
    (&["some", "several", "a few", "many"], "How many exactly?"),
    (&["etc", "and so on"], "Which items does the open-ended list leave out?"),
    (&["soon", "later", "asap"], "What is the deadline?"),
    (&["robust", "reliable"], "Which failure modes must it tolerate?"),
    (&["user-friendly", "intuitive"], "Which tasks must feel effortless, and for which users?"),
    (&["flexible", "configurable"], "What exactly should be configurable?"),
];

/// Question asked when none of the anchor phrases appear
type Anchor = Option<(&'static [&'static str], &'static str)>;

const INTENT_ANCHORS: IntentTable<Anchor> = IntentTable {
    code_generation: None,
    planning: Some((&["deadline", "timeline", "weeks", "months", "sprint"], "What is the time horizon of the plan?")),
    refinement: Some((&["keep", "preserve", "without changing"], "Which behaviour must stay exactly the same?")),
    debugging: Some((&["expected", "should"], "What is the expected behaviour, and what happens instead?")),
    documentation: Some((&["audience", "for developers", "for users", "readers"], "Who will read the documentation?")),
    testing: Some((&["unit", "integration", "e2e", "end-to-end"], "Which level of tests: unit, integration or end-to-end?")),
    migration: Some((&["version", "from"], "Which exact source and target versions?")),
    security_review: Some((&["owasp", "threat model", "compliance", "pci", "hipaa"], "Which standard or threat model applies?")),
    learning: Some((&["beginner", "experienced", "familiar", "new to"], "What does the reader already know?")),
    summarization: Some((&["words", "sentences", "length", "short", "brief", "bullet"], "How long should the summary be?")),
    prd_generation: None,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct AmbiguityDetector;

impl Pattern for AmbiguityDetector {
    fn meta(&self) -> &'static PatternMeta {
        &META
    }

    fn apply(
        &self,
        prompt: &str,
        ctx: &PatternContext,
        settings: &PatternSettings,
    ) -> Result<PatternResult, PatternError> {
        let dimension = ImprovementDimension::Clarity;

        if text::has_section(prompt, HEADING) {
            return Ok(PatternResult::unchanged(prompt, dimension, "Ambiguities already listed"));
        }

        let lower = ctx.original_prompt.to_lowercase();
        let mut questions = Vec::new();

        let opener = text::words(&lower).first().copied();
        if matches!(opener, Some("it" | "this" | "that")) {
            questions.push("What does the opening \"it\", \"this\" or \"that\" refer to?".to_string());
        }
        if let Some((anchors, question)) = INTENT_ANCHORS.get(ctx.intent.primary_intent) {
            if !lower.trim().is_empty() && !text::contains_any(&lower, anchors) {
                super::push_unique(&mut questions, question);
            }
        }
        for (terms, question) in VAGUE_TERMS {
            if text::contains_any(&lower, terms) {
                super::push_unique(&mut questions, question);
            }
        }

        let questions = text::cap(questions, super::setting(&META, settings, "maxAmbiguities"));
        if questions.is_empty() {
            return Ok(PatternResult::unchanged(prompt, dimension, "No ambiguities detected"));
        }

        let block = text::render_section(HEADING, &questions);
        Ok(PatternResult::applied(
            text::append_block(prompt, &block),
            dimension,
            format!("Raised {} clarifying question(s)", questions.len()),
            Impact::from_count(questions.len()),
        ))
    }
}
