//! Adds domain rules that are easy to forget, such as money handling or privacy.

use super::{Impact, ImprovementDimension, Pattern, PatternMeta, PatternMode, PatternResult, PatternSettings, SettingSpec};
use crate::brain::context::PatternContext;
use crate::brain::intent::Intent;
use crate::brain::text;
use crate::error::PatternError;

static META: PatternMeta = PatternMeta {
    id: "domain-context-enricher",
    name: "Domain Context Enricher",
    description: "Adds domain-specific considerations for recognised business domains",
    applicable_intents: &[
        Intent::CodeGeneration,
        Intent::Planning,
        Intent::PrdGeneration,
        Intent::SecurityReview,
    ],
    mode: PatternMode::Deep,
    priority: 3,
    run_after: &[],
    config_schema: &[SettingSpec {
        key: "maxItems",
        description: "Maximum number of considerations",
        default: 6,
    }],
};

const HEADING: &str = "Domain Considerations";

struct Domain {
    triggers: &'static [&'static str],
    considerations: &'static [&'static str],
}

const DOMAINS: &[Domain] = &[
    Domain {
        triggers: &["login", "signup", "sign up", "password", "auth", "authentication", "session"],
        considerations: &[
            "Hash passwords with a slow algorithm such as bcrypt or argon2",
            "Rate-limit login attempts",
        ],
    },
    Domain {
        triggers: &["payment", "payments", "stripe", "billing", "invoice", "subscription"],
        considerations: &[
            "Never store raw card data (PCI scope)",
            "Make payment requests idempotent",
        ],
    },
    Domain {
        triggers: &["cart", "checkout", "product", "products", "shop", "store", "inventory"],
        considerations: &[
            "Keep inventory consistent between cart and checkout",
            "Handle taxes and currencies per region",
        ],
    },
    Domain {
        triggers: &["bank", "ledger", "transaction", "transactions", "accounting", "money"],
        considerations: &[
            "Use decimal arithmetic for money",
            "Keep an audit trail of every balance change",
        ],
    },
    Domain {
        triggers: &["patient", "patients", "medical", "health", "hipaa", "clinic"],
        considerations: &["Protect health information and meet HIPAA obligations"],
    },
    Domain {
        triggers: &["personal data", "profile", "profiles", "gdpr", "email address", "tracking"],
        considerations: &["Support consent and data deletion requests (GDPR)"],
    },
    Domain {
        triggers: &["chat", "realtime", "real-time", "websocket", "live"],
        considerations: &["Reconnect and keep message order after network drops"],
    },
    Domain {
        triggers: &["page", "form", "ui", "screen", "button", "dashboard"],
        considerations: &["Keyboard navigation and screen reader labels"],
    },
];

#[derive(Debug, Clone, Copy, Default)]
pub struct DomainContextEnricher;

impl Pattern for DomainContextEnricher {
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
            return Ok(PatternResult::unchanged(prompt, dimension, "Domain considerations already listed"));
        }

        let lower = ctx.original_prompt.to_lowercase();
        let mut items = Vec::new();
        for domain in DOMAINS.iter().filter(|d| text::contains_any(&lower, d.triggers)) {
            for item in domain.considerations {
                super::push_unique(&mut items, item);
            }
        }

        let items = text::cap(items, super::setting(&META, settings, "maxItems"));
        if items.is_empty() {
            return Ok(PatternResult::unchanged(prompt, dimension, "No known domain detected"));
        }

        let block = text::render_section(HEADING, &items);
        Ok(PatternResult::applied(
            text::append_block(prompt, &block),
            dimension,
            format!("Added {} domain consideration(s)", items.len()),
            Impact::from_count(items.len()),
        ))
    }
}
