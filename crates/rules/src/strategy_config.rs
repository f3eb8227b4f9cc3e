//! StrategyConfig rule kind: confidence calibration and guidance limits
//! for the strategy recommendation engine.

use serde::{Deserialize, Serialize};

use crate::fatigue_config::ConfidenceThresholds;
use crate::schema::CommonMetadata;

// ── YAML-level types ────────────────────────────────────────────────

/// Top-level StrategyConfig rule document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StrategyConfigRule {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    pub spec: StrategyConfigSpec,
}

/// Specification section of a StrategyConfig rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StrategyConfigSpec {
    /// Metric points behind a platform judgment required per confidence level.
    pub confidence: ConfidenceThresholds,
    /// Upper bound on creative-guidance bullets per recommendation.
    pub max_guidance_items: usize,
}

impl Default for StrategyConfigSpec {
    fn default() -> Self {
        Self {
            confidence: ConfidenceThresholds::default(),
            max_guidance_items: 4,
        }
    }
}

// ── Compiled type ───────────────────────────────────────────────────

/// Pre-compiled strategy config (the document body is already typed).
pub type CompiledStrategyConfig = StrategyConfigSpec;

impl StrategyConfigRule {
    /// Compile the YAML config.
    pub fn compile(&self) -> CompiledStrategyConfig {
        self.spec.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = include_str!("../../../data/rules/strategy/strategy-config.yml");

    #[test]
    fn parse_strategy_config_yaml() {
        let rule: StrategyConfigRule = serde_yaml::from_str(YAML).unwrap();
        assert_eq!(rule.kind, "StrategyConfig");
        assert!(rule.spec.confidence.high_points > rule.spec.confidence.medium_points);
    }

    #[test]
    fn shipped_yaml_matches_compiled_defaults() {
        let rule: StrategyConfigRule = serde_yaml::from_str(YAML).unwrap();
        assert_eq!(rule.compile(), StrategyConfigSpec::default());
    }
}
