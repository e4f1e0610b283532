//! CLEAR prompt pipeline.
//!
//! Classifies a prompt's intent, scores it on the CLEAR dimensions, triages it
//! and rewrites it through an ordered pipeline of deterministic patterns.

pub mod brain;
pub mod config;
pub mod error;
pub mod logging;
pub mod patterns;

#[cfg(test)]
mod tests;

pub use brain::{ImprovementResult, Mode, PromptOptimizer};
pub use config::AppConfig;
pub use error::{AppError, PatternError};
pub use patterns::{LibraryConfig, Pattern, PatternLibrary};
