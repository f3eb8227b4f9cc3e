//! Multi-kind rule document container and accessors.

use super::{CommonMetadata, RuleKind};
use crate::cluster_config::ClusterConfigRule;
use crate::fatigue_config::FatigueConfigRule;
use crate::playbook::PlaybookRule;
use crate::signature_config::SignatureConfigRule;
use crate::strategy_config::StrategyConfigRule;

/// A fully deserialized rule of any supported kind.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleDocument {
    /// Fatigue config -- classification cascade, signal and scale-potential thresholds.
    FatigueConfig(FatigueConfigRule),
    /// Signature config -- hook-type lookup table and duration buckets.
    SignatureConfig(SignatureConfigRule),
    /// Cluster config -- grouping discriminators and roll-up thresholds.
    ClusterConfig(ClusterConfigRule),
    /// Strategy config -- confidence calibration and guidance limits.
    StrategyConfig(StrategyConfigRule),
    /// Playbook -- static ordered-step response to a scenario.
    Playbook(PlaybookRule),
}

impl RuleDocument {
    /// Get the rule's metadata regardless of kind.
    pub fn metadata(&self) -> &CommonMetadata {
        match self {
            RuleDocument::FatigueConfig(rule) => &rule.metadata,
            RuleDocument::SignatureConfig(rule) => &rule.metadata,
            RuleDocument::ClusterConfig(rule) => &rule.metadata,
            RuleDocument::StrategyConfig(rule) => &rule.metadata,
            RuleDocument::Playbook(rule) => &rule.metadata,
        }
    }

    /// Get the rule kind.
    pub fn kind(&self) -> RuleKind {
        match self {
            RuleDocument::FatigueConfig(_) => RuleKind::FatigueConfig,
            RuleDocument::SignatureConfig(_) => RuleKind::SignatureConfig,
            RuleDocument::ClusterConfig(_) => RuleKind::ClusterConfig,
            RuleDocument::StrategyConfig(_) => RuleKind::StrategyConfig,
            RuleDocument::Playbook(_) => RuleKind::Playbook,
        }
    }

    pub fn as_fatigue_config(&self) -> Option<&FatigueConfigRule> {
        match self {
            RuleDocument::FatigueConfig(rule) => Some(rule),
            _ => None,
        }
    }

    pub fn as_signature_config(&self) -> Option<&SignatureConfigRule> {
        match self {
            RuleDocument::SignatureConfig(rule) => Some(rule),
            _ => None,
        }
    }

    pub fn as_cluster_config(&self) -> Option<&ClusterConfigRule> {
        match self {
            RuleDocument::ClusterConfig(rule) => Some(rule),
            _ => None,
        }
    }

    pub fn as_strategy_config(&self) -> Option<&StrategyConfigRule> {
        match self {
            RuleDocument::StrategyConfig(rule) => Some(rule),
            _ => None,
        }
    }

    pub fn as_playbook(&self) -> Option<&PlaybookRule> {
        match self {
            RuleDocument::Playbook(rule) => Some(rule),
            _ => None,
        }
    }

    /// Serialize this document to YAML, delegating to the inner type.
    pub fn to_yaml(&self) -> std::result::Result<String, serde_yaml::Error> {
        match self {
            RuleDocument::FatigueConfig(r) => serde_yaml::to_string(r),
            RuleDocument::SignatureConfig(r) => serde_yaml::to_string(r),
            RuleDocument::ClusterConfig(r) => serde_yaml::to_string(r),
            RuleDocument::StrategyConfig(r) => serde_yaml::to_string(r),
            RuleDocument::Playbook(r) => serde_yaml::to_string(r),
        }
    }
}
