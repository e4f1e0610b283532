//! Application configuration.
//!
//! A JSON file (from `--config` or `CLEAR_CONFIG`) deserialized into
//! [`AppConfig`]; `CLEAR_MODE` overrides the mode. Pattern-level entries stay
//! fail-safe and are checked by the library, triage thresholds are validated here.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use validator::Validate;

use crate::brain::context::Mode;
use crate::brain::triage::TriageConfig;
use crate::error::AppError;
use crate::patterns::LibraryConfig;

/// Path of the config file when `--config` is not given
pub const CONFIG_ENV: &str = "CLEAR_CONFIG";
/// Overrides the configured mode (`fast` or `deep`)
pub const MODE_ENV: &str = "CLEAR_MODE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Mode used when the caller does not pick one
    pub mode: Mode,
    /// `disabled`, `priorityOverrides` and `customSettings`
    pub patterns: LibraryConfig,
    #[validate(nested)]
    pub triage: TriageConfig,
}

impl AppConfig {
    /// Load the configuration.
    ///
    /// `path` wins over `CLEAR_CONFIG`; with neither, defaults are used.
    /// Environment overrides and validation run in every case.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| env::var(CONFIG_ENV).ok().filter(|p| !p.trim().is_empty()).map(PathBuf::from));

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => {
                debug!("No config file, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<(), AppError> {
        if let Ok(raw) = env::var(MODE_ENV) {
            if !raw.trim().is_empty() {
                self.mode = raw
                    .parse()
                    .map_err(|e| AppError::Config(format!("{}: {}", MODE_ENV, e)))?;
            }
        }
        Ok(())
    }
}
