//! # Patterns
//!
//! Stateless rewrite rules applied one after another to a prompt.
//!
//! Every pattern runs the same phases:
//! 1. Guard: return `applied: false` when the target condition already holds
//! 2. Detect: deterministic keyword/regex/structure checks on the lowercased prompt
//! 3. Render: a stable markdown block, prepended or appended
//! 4. Cap: findings truncated to a configurable maximum
//! 5. Impact: `low` for 0-1 findings, `medium` for 2-3, `high` for 4+
//!
//! The [`PatternLibrary`] selects and orders the patterns for one run.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::brain::context::{Mode, PatternContext};
use crate::brain::intent::Intent;
use crate::error::PatternError;

pub mod library;

mod actionability_enhancer;
mod alternative_approach_generator;
mod ambiguity_detector;
mod assumption_explicitizer;
mod completeness_validator;
mod conciseness_filter;
mod dependency_identifier;
mod domain_context_enricher;
mod edge_case_identifier;
mod error_tolerance_enhancer;
mod objective_clarifier;
mod output_format_enforcer;
mod prd_structure_enforcer;
mod prerequisite_identifier;
mod requirement_prioritizer;
mod scope_definer;
mod structure_organizer;
mod success_criteria_enforcer;
mod success_metrics_enforcer;
mod technical_context_enricher;
mod user_persona_enricher;
mod validation_checklist_creator;

pub use actionability_enhancer::ActionabilityEnhancer;
pub use alternative_approach_generator::AlternativeApproachGenerator;
pub use ambiguity_detector::AmbiguityDetector;
pub use assumption_explicitizer::AssumptionExplicitizer;
pub use completeness_validator::CompletenessValidator;
pub use conciseness_filter::ConcisenessFilter;
pub use dependency_identifier::DependencyIdentifier;
pub use domain_context_enricher::DomainContextEnricher;
pub use edge_case_identifier::EdgeCaseIdentifier;
pub use error_tolerance_enhancer::ErrorToleranceEnhancer;
pub use library::{LibraryConfig, PatternLibrary};
pub use objective_clarifier::ObjectiveClarifier;
pub use output_format_enforcer::OutputFormatEnforcer;
pub use prd_structure_enforcer::PrdStructureEnforcer;
pub use prerequisite_identifier::PrerequisiteIdentifier;
pub use requirement_prioritizer::RequirementPrioritizer;
pub use scope_definer::ScopeDefiner;
pub use structure_organizer::StructureOrganizer;
pub use success_criteria_enforcer::SuccessCriteriaEnforcer;
pub use success_metrics_enforcer::SuccessMetricsEnforcer;
pub use technical_context_enricher::TechnicalContextEnricher;
pub use user_persona_enricher::UserPersonaEnricher;
pub use validation_checklist_creator::ValidationChecklistCreator;

/// Lowest and highest allowed priority
pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 10;

/// Which analysis mode a pattern runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternMode {
    Fast,
    Deep,
    Both,
}

impl PatternMode {
    pub fn matches(&self, mode: Mode) -> bool {
        match self {
            PatternMode::Both => true,
            PatternMode::Fast => mode == Mode::Fast,
            PatternMode::Deep => mode == Mode::Deep,
        }
    }
}

/// One tunable of a pattern, read from `customSettings`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingSpec {
    pub key: &'static str,
    pub description: &'static str,
    pub default: usize,
}

/// Static metadata of a pattern
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternMeta {
    /// Unique id within a library (kebab-case)
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub applicable_intents: &'static [Intent],
    pub mode: PatternMode,
    /// 1 (runs last) to 10 (runs first)
    pub priority: u8,
    /// Ids this pattern must run after when both are selected
    pub run_after: &'static [&'static str],
    pub config_schema: &'static [SettingSpec],
}

/// Dimension of the prompt a pattern improved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImprovementDimension {
    Clarity,
    Efficiency,
    Structure,
    Completeness,
    Actionability,
    Explicitness,
}

impl fmt::Display for ImprovementDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ImprovementDimension::Clarity => "clarity",
            ImprovementDimension::Efficiency => "efficiency",
            ImprovementDimension::Structure => "structure",
            ImprovementDimension::Completeness => "completeness",
            ImprovementDimension::Actionability => "actionability",
            ImprovementDimension::Explicitness => "explicitness",
        };
        write!(f, "{}", label)
    }
}

/// How much a pattern changed or added
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    Medium,
    High,
}

impl Impact {
    /// Default bands: 0-1 findings low, 2-3 medium, 4+ high
    pub fn from_count(findings: usize) -> Self {
        match findings {
            0..=1 => Impact::Low,
            2..=3 => Impact::Medium,
            _ => Impact::High,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Improvement {
    pub dimension: ImprovementDimension,
    pub description: String,
    pub impact: Impact,
}

/// Output of one pattern invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternResult {
    pub enhanced_prompt: String,
    pub improvement: Improvement,
    pub applied: bool,
}

impl PatternResult {
    /// Not applied: the prompt passes through untouched
    pub fn unchanged(prompt: &str, dimension: ImprovementDimension, description: impl Into<String>) -> Self {
        Self {
            enhanced_prompt: prompt.to_string(),
            improvement: Improvement {
                dimension,
                description: description.into(),
                impact: Impact::Low,
            },
            applied: false,
        }
    }

    pub fn applied(
        enhanced_prompt: String,
        dimension: ImprovementDimension,
        description: impl Into<String>,
        impact: Impact,
    ) -> Self {
        Self {
            enhanced_prompt,
            improvement: Improvement {
                dimension,
                description: description.into(),
                impact,
            },
            applied: true,
        }
    }
}

/// Per-pattern settings from `customSettings`.
///
/// Lookups fall back to the supplied default when a key is missing or has the
/// wrong type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternSettings(Map<String, Value>);

impl PatternSettings {
    pub fn new(values: Map<String, Value>) -> Self {
        Self(values)
    }

    pub fn usize_or(&self, key: &str, default: usize) -> usize {
        self.0
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(default)
    }
}

/// A single stateless rewrite rule
pub trait Pattern: Send + Sync {
    fn meta(&self) -> &'static PatternMeta;

    /// Rewrite `prompt`. `ctx` is shared by every pattern of the run and is
    /// never modified; `ctx.original_prompt` is the untouched input.
    fn apply(
        &self,
        prompt: &str,
        ctx: &PatternContext,
        settings: &PatternSettings,
    ) -> Result<PatternResult, PatternError>;

    fn id(&self) -> &'static str {
        self.meta().id
    }

    /// Intent listed in the metadata and mode compatible
    fn is_applicable(&self, ctx: &PatternContext) -> bool {
        let meta = self.meta();
        meta.applicable_intents.contains(&ctx.intent.primary_intent) && meta.mode.matches(ctx.mode)
    }
}

impl fmt::Debug for dyn Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({})", self.id())
    }
}

/// Read a cap from the settings, using the default declared in the schema
pub(crate) fn setting(meta: &PatternMeta, settings: &PatternSettings, key: &str) -> usize {
    let default = meta
        .config_schema
        .iter()
        .find(|spec| spec.key == key)
        .map_or(0, |spec| spec.default);
    settings.usize_or(key, default)
}

/// True if the text already carries one of the named sections
pub(crate) fn has_any_section(text: &str, names: &[&str]) -> bool {
    names.iter().any(|name| crate::brain::text::has_section(text, name))
}

/// Append `item` unless an equal one is already listed
pub(crate) fn push_unique(items: &mut Vec<String>, item: &str) {
    if !items.iter().any(|existing| existing == item) {
        items.push(item.to_string());
    }
}

/// Every built-in pattern, in registration order
pub fn builtin_patterns() -> Vec<Box<dyn Pattern>> {
    vec![
        Box::new(ConcisenessFilter),
        Box::new(ObjectiveClarifier),
        Box::new(PrdStructureEnforcer),
        Box::new(TechnicalContextEnricher),
        Box::new(StructureOrganizer),
        Box::new(ScopeDefiner),
        Box::new(CompletenessValidator),
        Box::new(ActionabilityEnhancer),
        Box::new(AmbiguityDetector),
        Box::new(OutputFormatEnforcer),
        Box::new(SuccessCriteriaEnforcer),
        Box::new(EdgeCaseIdentifier),
        Box::new(ErrorToleranceEnhancer),
        Box::new(PrerequisiteIdentifier),
        Box::new(DependencyIdentifier),
        Box::new(UserPersonaEnricher),
        Box::new(DomainContextEnricher),
        Box::new(AssumptionExplicitizer),
        Box::new(RequirementPrioritizer),
        Box::new(SuccessMetricsEnforcer),
        Box::new(ValidationChecklistCreator),
        Box::new(AlternativeApproachGenerator),
    ]
}
