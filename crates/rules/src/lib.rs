//! YAML rule documents for the creative intelligence engine.
//!
//! This crate provides:
//! - YAML-based rule definitions with serde deserialization
//!   (FatigueConfig, SignatureConfig, ClusterConfig, StrategyConfig, Playbook)
//! - A load-once filesystem loader with per-file error reporting
//! - Semantic validation of thresholds, lookup tables and playbooks
//! - [`RuleSet`]: the compiled, read-only configuration consumed by the analyzers

pub mod cluster_config;
pub mod fatigue_config;
pub mod loader;
pub mod playbook;
pub mod ruleset;
pub mod schema;
pub mod signature_config;
pub mod strategy_config;
pub mod validation;

pub use loader::{RuleError, RuleLoader};
pub use ruleset::RuleSet;
