//! YAML DSL schema types with serde deserialization.
//!
//! Defines the shared document scaffolding:
//! - `RuleEnvelope`: lightweight first-pass header (apiVersion, kind, metadata)
//! - `RuleDocument`: enum dispatching to kind-specific types
//!
//! Kind-specific types live in their own modules (`fatigue_config`,
//! `signature_config`, `cluster_config`, `strategy_config`, `playbook`).

mod document;
mod envelope;
mod kind;
mod metadata;

pub use document::*;
pub use envelope::*;
pub use kind::*;
pub use metadata::*;
