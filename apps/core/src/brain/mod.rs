//! # Brain Module
//!
//! Deterministic, rule-based analysis of a prompt before it is rewritten.
//!
//! ## Components
//! - `intent`: Intent classification using regex signal voting
//! - `quality`: CLEAR quality scoring
//! - `triage`: Fast-vs-deep escalation decision
//! - `signals`: Shared prompt signals (action verbs, tech stack, output format)
//! - `text`: Stateless text helpers shared by every pattern
//! - `context`: Mode and the per-run pattern context
//! - `report`: Output data structure
//! - `optimizer`: Main orchestrator

pub mod context;
pub mod intent;
pub mod optimizer;
pub mod quality;
pub mod report;
pub mod signals;
pub mod text;
pub mod triage;

// Re-export main types for convenience
pub use context::{Mode, PatternContext};
pub use intent::{Characteristics, Intent, IntentClassifier, IntentResult, IntentTable};
pub use optimizer::PromptOptimizer;
pub use quality::{Dimension, QualityScore, QualityScorer, Rating};
pub use report::{AppliedPattern, Analysis, ImprovementResult, Recommendation};
pub use triage::{TriageConfig, TriageEngine, TriageResult, TriageSignals};
