//! Pattern Library - registry plus the selection/ordering algorithm.
//!
//! Turns (prompt, intent, quality scores, mode, config) into the ordered list of
//! patterns the optimizer runs:
//! 1. keep patterns applicable to the intent/mode and not disabled
//! 2. effective priority = in-range override, else declared priority
//! 3. stable sort by effective priority, descending
//! 4. one best-effort `run_after` adjustment pass

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use super::{builtin_patterns, Pattern, PatternSettings, MAX_PRIORITY, MIN_PRIORITY};
use crate::brain::context::{Mode, PatternContext};
use crate::brain::intent::IntentResult;
use crate::brain::quality::QualityScore;
use crate::error::AppError;

/// Library-level configuration, usually the `patterns` object of the app config
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LibraryConfig {
    /// Pattern ids removed from every pipeline
    pub disabled: Vec<String>,
    /// id -> priority; values outside 1..=10 are ignored
    pub priority_overrides: BTreeMap<String, i64>,
    /// id -> settings object handed to the pattern
    pub custom_settings: BTreeMap<String, Value>,
}

impl LibraryConfig {
    pub fn is_disabled(&self, id: &str) -> bool {
        self.disabled.iter().any(|d| d == id)
    }

    /// Override for `id` if present and within the allowed range
    pub fn priority_override(&self, id: &str) -> Option<u8> {
        self.priority_overrides
            .get(id)
            .and_then(|v| u8::try_from(*v).ok())
            .filter(|v| (MIN_PRIORITY..=MAX_PRIORITY).contains(v))
    }
}

/// Registry of patterns plus the configuration applied to it.
///
/// `apply_config` mutates the instance and is not re-entrant: configure once,
/// then share. `applicable_patterns_with` takes the config as a value instead.
#[derive(Default)]
pub struct PatternLibrary {
    patterns: Vec<Box<dyn Pattern>>,
    config: LibraryConfig,
    settings: HashMap<String, PatternSettings>,
}

impl PatternLibrary {
    /// Empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Library holding every built-in pattern
    pub fn builtin() -> Self {
        let mut library = Self::new();
        for pattern in builtin_patterns() {
            if let Err(e) = library.register(pattern) {
                warn!("Skipping built-in pattern: {}", e);
            }
        }
        library
    }

    /// Library holding exactly the given patterns, in order
    pub fn from_patterns<I>(patterns: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = Box<dyn Pattern>>,
    {
        let mut library = Self::new();
        for pattern in patterns {
            library.register(pattern)?;
        }
        Ok(library)
    }

    /// Register a pattern; ids must be unique
    pub fn register(&mut self, pattern: Box<dyn Pattern>) -> Result<(), AppError> {
        let id = pattern.id();
        if self.get(id).is_some() {
            return Err(AppError::DuplicatePattern(id.to_string()));
        }
        self.patterns.push(pattern);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&dyn Pattern> {
        self.patterns.iter().find(|p| p.id() == id).map(|p| p.as_ref())
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.patterns.iter().map(|p| p.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Apply a configuration to this instance.
    ///
    /// Configuration faults never fail: unknown ids and out-of-range priorities
    /// are logged and ignored.
    pub fn apply_config(&mut self, config: LibraryConfig) {
        for id in &config.disabled {
            if self.get(id).is_none() {
                warn!(pattern = %id, "Ignoring unknown pattern id in disabled list");
            }
        }

        for (id, value) in &config.priority_overrides {
            if self.get(id).is_none() {
                warn!(pattern = %id, "Ignoring priority override for unknown pattern");
            } else if config.priority_override(id).is_none() {
                warn!(
                    pattern = %id,
                    value,
                    "Ignoring priority override outside {}..={}",
                    MIN_PRIORITY,
                    MAX_PRIORITY
                );
            }
        }

        let mut settings = HashMap::new();
        for (id, value) in &config.custom_settings {
            if self.get(id).is_none() {
                warn!(pattern = %id, "Ignoring settings for unknown pattern");
                continue;
            }
            match value {
                Value::Object(map) => {
                    settings.insert(id.clone(), PatternSettings::new(map.clone()));
                }
                _ => warn!(pattern = %id, "Ignoring settings that are not an object"),
            }
        }

        self.settings = settings;
        self.config = config;
    }

    /// Settings applied for a pattern, if any
    pub fn pattern_settings(&self, id: &str) -> Option<&PatternSettings> {
        self.settings.get(id)
    }

    /// Priority used for ordering under `config`
    pub fn effective_priority(pattern: &dyn Pattern, config: &LibraryConfig) -> u8 {
        config
            .priority_override(pattern.id())
            .unwrap_or(pattern.meta().priority)
    }

    /// Ordered pipeline under the instance configuration
    pub fn applicable_patterns(
        &self,
        prompt: &str,
        intent: &IntentResult,
        scores: &QualityScore,
        mode: Mode,
    ) -> Vec<&dyn Pattern> {
        self.applicable_patterns_with(prompt, intent, scores, mode, &self.config)
    }

    /// Ordered pipeline under an explicit configuration value
    pub fn applicable_patterns_with(
        &self,
        prompt: &str,
        intent: &IntentResult,
        scores: &QualityScore,
        mode: Mode,
        config: &LibraryConfig,
    ) -> Vec<&dyn Pattern> {
        let ctx = PatternContext::new(mode, prompt, intent.clone());

        let mut selected: Vec<(&dyn Pattern, u8)> = self
            .patterns
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| p.is_applicable(&ctx) && !config.is_disabled(p.id()))
            .map(|p| (p, Self::effective_priority(p, config)))
            .collect();

        // sort_by is stable: equal priorities keep registration order
        selected.sort_by(|a, b| b.1.cmp(&a.1));
        let mut ordered: Vec<&dyn Pattern> = selected.into_iter().map(|(p, _)| p).collect();

        Self::adjust_for_dependencies(&mut ordered);

        debug!(
            intent = %intent.primary_intent,
            mode = %mode,
            overall = scores.overall,
            pipeline = ?ordered.iter().map(|p| p.id()).collect::<Vec<_>>(),
            "Selected pattern pipeline"
        );
        ordered
    }

    /// Single pass: a pattern that precedes one of its `run_after` targets moves
    /// to just after that target. Chains of several hops are not re-checked.
    fn adjust_for_dependencies(ordered: &mut Vec<&dyn Pattern>) {
        let snapshot: Vec<&'static str> = ordered.iter().map(|p| p.id()).collect();

        for id in snapshot {
            let Some(pattern) = ordered.iter().find(|p| p.id() == id).copied() else {
                continue;
            };
            for dep in pattern.meta().run_after {
                let pos_a = ordered.iter().position(|p| p.id() == id);
                let pos_b = ordered.iter().position(|p| p.id() == *dep);
                if let (Some(a), Some(b)) = (pos_a, pos_b) {
                    if a < b {
                        let moved = ordered.remove(a);
                        // removal shifted the target to b - 1, so b is right after it
                        ordered.insert(b, moved);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::intent::Intent;
    use crate::brain::quality::QualityScorer;

    fn intent(i: Intent) -> IntentResult {
        IntentResult::supplied(i, "")
    }

    #[test]
    fn test_builtin_registers_everything() {
        let library = PatternLibrary::builtin();
        assert_eq!(library.len(), builtin_patterns().len());
        assert!(library.get("conciseness-filter").is_some());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut library = PatternLibrary::new();
        assert!(library.register(Box::new(super::super::ConcisenessFilter)).is_ok());
        let err = library.register(Box::new(super::super::ConcisenessFilter));
        assert!(matches!(err, Err(AppError::DuplicatePattern(id)) if id == "conciseness-filter"));
    }

    #[test]
    fn test_priority_override_range() {
        let mut config = LibraryConfig::default();
        config.priority_overrides.insert("a".into(), 0);
        config.priority_overrides.insert("b".into(), 11);
        config.priority_overrides.insert("c".into(), 7);
        config.priority_overrides.insert("d".into(), -3);
        assert_eq!(config.priority_override("a"), None);
        assert_eq!(config.priority_override("b"), None);
        assert_eq!(config.priority_override("c"), Some(7));
        assert_eq!(config.priority_override("d"), None);
    }

    #[test]
    fn test_pipeline_sorted_by_priority() {
        let library = PatternLibrary::builtin();
        let scores = QualityScorer::new().score("Create a login page", Mode::Fast);
        let pipeline = library.applicable_patterns("Create a login page", &intent(Intent::CodeGeneration), &scores, Mode::Fast);
        let ids: Vec<&str> = pipeline.iter().map(|p| p.id()).collect();
        assert_eq!(ids.first(), Some(&"conciseness-filter"));
        assert_eq!(ids.get(1), Some(&"objective-clarifier"));
    }

    #[test]
    fn test_custom_settings_only_for_known_objects() {
        let mut library = PatternLibrary::builtin();
        let config: LibraryConfig = serde_json::from_value(serde_json::json!({
            "customSettings": {
                "edge-case-identifier": {"maxEdgeCases": 2},
                "ambiguity-detector": 5,
                "no-such-pattern": {"x": 1}
            }
        }))
        .unwrap();
        library.apply_config(config);
        assert_eq!(
            library.pattern_settings("edge-case-identifier").map(|s| s.usize_or("maxEdgeCases", 8)),
            Some(2)
        );
        assert!(library.pattern_settings("ambiguity-detector").is_none());
        assert!(library.pattern_settings("no-such-pattern").is_none());
    }
}
