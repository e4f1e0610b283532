//! Names the services and components the work depends on.

use super::{Impact, ImprovementDimension, Pattern, PatternMeta, PatternMode, PatternResult, PatternSettings, SettingSpec};
use crate::brain::context::PatternContext;
use crate::brain::intent::Intent;
use crate::brain::text;
use crate::error::PatternError;

static META: PatternMeta = PatternMeta {
    id: "dependency-identifier",
    name: "Dependency Identifier",
    description: "Adds a Dependencies section for the services the request relies on",
    applicable_intents: &[
        Intent::Planning,
        Intent::PrdGeneration,
        Intent::CodeGeneration,
        Intent::Migration,
    ],
    mode: PatternMode::Deep,
    priority: 4,
    run_after: &[],
    config_schema: &[SettingSpec {
        key: "maxDependencies",
        description: "Maximum number of dependencies",
        default: 8,
    }],
};

const HEADING: &str = "Dependencies";

const DEPENDENCIES: &[(&[&str], &str)] = &[
    (&["api", "endpoint", "backend", "rest", "graphql"], "API service"),
    (&["database", "db", "sql", "postgres", "postgresql", "mysql", "mongodb"], "Database"),
    (&["auth", "login", "signup", "sso", "oauth", "session"], "Authentication provider"),
    (&["payment", "payments", "stripe", "checkout", "billing"], "Payment gateway"),
    (&["email", "emails", "notification", "notifications", "sms"], "Email or notification service"),
    (&["upload", "uploads", "storage", "s3", "files"], "File storage"),
    (&["cache", "caching", "redis"], "Cache"),
    (&["queue", "worker", "workers", "background job", "cron"], "Background job runner"),
    (&["search"], "Search index"),
    (&["analytics", "tracking", "metrics"], "Analytics provider"),
    (&["third-party", "external", "integration", "integrations"], "External integrations named above"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyIdentifier;

impl Pattern for DependencyIdentifier {
    fn meta(&self) -> &'static PatternMeta {
        &META
    }

    fn apply(
        &self,
        prompt: &str,
        ctx: &PatternContext,
        settings: &PatternSettings,
    ) -> Result<PatternResult, PatternError> {
        let dimension = ImprovementDimension::Completeness;

        if text::has_section(prompt, HEADING) {
            return Ok(PatternResult::unchanged(prompt, dimension, "Dependencies already listed"));
        }

        let lower = ctx.original_prompt.to_lowercase();
        let found: Vec<String> = DEPENDENCIES
            .iter()
            .filter(|(triggers, _)| text::contains_any(&lower, triggers))
            .map(|(_, name)| format!("{}: confirm it exists, who owns it and its interface", name))
            .collect();

        let found = text::cap(found, super::setting(&META, settings, "maxDependencies"));
        if found.is_empty() {
            return Ok(PatternResult::unchanged(prompt, dimension, "No external dependencies detected"));
        }

        let block = text::render_section(HEADING, &found);
        Ok(PatternResult::applied(
            text::append_block(prompt, &block),
            dimension,
            format!("Identified {} dependenc(ies)", found.len()),
            Impact::from_count(found.len()),
        ))
    }
}
