//! Filesystem rule loader.
//!
//! Scans the rules directory once at startup, parses every YAML document via
//! two-pass deserialization (RuleEnvelope -> RuleDocument), validates it and
//! keeps the result in memory. The loaded set is immutable afterwards; build
//! a [`RuleSet`](crate::RuleSet) from it.

mod core;
mod error;

#[cfg(test)]
mod tests;

pub use self::core::RuleLoader;
pub(crate) use self::core::parse_document;
pub use self::error::{LoadResult, LoadStatus, Result, RuleError};
