//! Rule kind enum for two-pass deserialization dispatch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported rule kinds for two-pass deserialization dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RuleKind {
    FatigueConfig,
    SignatureConfig,
    ClusterConfig,
    StrategyConfig,
    Playbook,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::FatigueConfig => write!(f, "FatigueConfig"),
            RuleKind::SignatureConfig => write!(f, "SignatureConfig"),
            RuleKind::ClusterConfig => write!(f, "ClusterConfig"),
            RuleKind::StrategyConfig => write!(f, "StrategyConfig"),
            RuleKind::Playbook => write!(f, "Playbook"),
        }
    }
}

impl FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "FatigueConfig" => Ok(RuleKind::FatigueConfig),
            "SignatureConfig" => Ok(RuleKind::SignatureConfig),
            "ClusterConfig" => Ok(RuleKind::ClusterConfig),
            "StrategyConfig" => Ok(RuleKind::StrategyConfig),
            "Playbook" => Ok(RuleKind::Playbook),
            other => Err(format!("unknown rule kind: '{}'", other)),
        }
    }
}
