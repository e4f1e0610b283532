//! Per-run snapshot handed to every pattern.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::intent::IntentResult;

/// Analysis depth
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Lightweight heuristics only
    #[default]
    Fast,
    /// Adds the adaptiveness/reflectiveness dimensions and the deep-only patterns
    Deep,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Fast => "fast",
            Mode::Deep => "deep",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fast" => Ok(Mode::Fast),
            "deep" => Ok(Mode::Deep),
            other => Err(format!("unknown mode '{}' (expected fast or deep)", other)),
        }
    }
}

/// Read-only snapshot shared by every pattern invoked in one run.
///
/// Patterns receive it by shared reference; `original_prompt` always holds the
/// true input, whatever earlier patterns did to the working prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternContext {
    pub mode: Mode,
    pub original_prompt: String,
    pub intent: IntentResult,
}

impl PatternContext {
    pub fn new(mode: Mode, original_prompt: impl Into<String>, intent: IntentResult) -> Self {
        Self {
            mode,
            original_prompt: original_prompt.into(),
            intent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("fast".parse::<Mode>(), Ok(Mode::Fast));
        assert_eq!(" DEEP ".parse::<Mode>(), Ok(Mode::Deep));
        assert!("medium".parse::<Mode>().is_err());
        assert_eq!(Mode::default(), Mode::Fast);
    }

    #[test]
    fn test_mode_serde() {
        assert_eq!(serde_json::to_string(&Mode::Deep).unwrap(), "\"deep\"");
    }
}
