//! Adds measurable product metrics to plans and PRDs.

use super::{Impact, ImprovementDimension, Pattern, PatternMeta, PatternMode, PatternResult, PatternSettings, SettingSpec};
use crate::brain::context::PatternContext;
use crate::brain::intent::Intent;
use crate::brain::text;
use crate::error::PatternError;

static META: PatternMeta = PatternMeta {
    id: "success-metrics-enforcer",
    name: "Success Metrics Enforcer",
    description: "Adds a Success Metrics section with measurable targets",
    applicable_intents: &[Intent::PrdGeneration, Intent::Planning],
    mode: PatternMode::Deep,
    priority: 3,
    run_after: &[],
    config_schema: &[SettingSpec {
        key: "maxMetrics",
        description: "Maximum number of metrics",
        default: 5,
    }],
};

const HEADING: &str = "Success Metrics";
const MEASURED_PHRASES: &[&str] = &["kpi", "kpis", "metric", "metrics", "okr", "okrs"];

const TOPIC_METRICS: &[(&[&str], &str)] = &[
    (&["signup", "sign up", "onboarding", "register", "registration"], "Signup conversion rate"),
    (&["retention", "engagement", "habit", "daily", "weekly"], "Weekly active users and 30-day retention"),
    (&["performance", "fast", "latency", "load time", "speed"], "p95 page load or response time"),
    (&["revenue", "sales", "checkout", "payment", "subscription", "pricing"], "Checkout conversion and revenue per user"),
    (&["support", "tickets", "errors", "bugs", "reliability"], "Support tickets and error rate per release"),
    (&["search"], "Search success rate: a result clicked within the top five"),
];

const DEFAULT_METRICS: &[&str] = &[
    "Adoption: share of target users using the feature within 30 days",
    "Task success rate for the primary flow",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct SuccessMetricsEnforcer;

impl Pattern for SuccessMetricsEnforcer {
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

        let lower = ctx.original_prompt.to_lowercase();
        if text::has_section(prompt, HEADING) || text::contains_any(&lower, MEASURED_PHRASES) {
            return Ok(PatternResult::unchanged(prompt, dimension, "Success metrics already defined"));
        }
        if lower.trim().is_empty() {
            return Ok(PatternResult::unchanged(prompt, dimension, "Nothing to measure"));
        }

        let mut metrics: Vec<String> = TOPIC_METRICS
            .iter()
            .filter(|(triggers, _)| text::contains_any(&lower, triggers))
            .map(|(_, metric)| metric.to_string())
            .collect();
        for metric in DEFAULT_METRICS {
            super::push_unique(&mut metrics, metric);
        }

        let metrics = text::cap(metrics, super::setting(&META, settings, "maxMetrics"));
        if metrics.is_empty() {
            return Ok(PatternResult::unchanged(prompt, dimension, "Metrics capped to nothing"));
        }

        let block = text::render_section(HEADING, &metrics);
        Ok(PatternResult::applied(
            text::append_block(prompt, &block),
            dimension,
            format!("Added {} success metric(s)", metrics.len()),
            Impact::from_count(metrics.len()),
        ))
    }
}
