//! Test Module
//!
//! Cross-module test suite for the prompt pipeline.
//!
//! ## Test Categories
//! - `brain_tests`: Intent classification, CLEAR scoring bounds, triage monotonicity
//! - `pattern_tests`: Guard idempotence and determinism of every built-in pattern
//! - `library_tests`: Selection, priority ordering, dependency ordering, config faults
//! - `optimizer_tests`: End-to-end scenarios and fault tolerance
//! - `config_tests`: Config file and environment loading

pub mod brain_tests;
pub mod library_tests;
pub mod optimizer_tests;
