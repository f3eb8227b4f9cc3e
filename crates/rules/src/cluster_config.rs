//! ClusterConfig rule kind: grouping discriminators and the fatigue-risk /
//! scale-reliability roll-up thresholds.

use serde::{Deserialize, Serialize};

use crate::schema::CommonMetadata;

// ── YAML-level types ────────────────────────────────────────────────

/// Top-level ClusterConfig rule document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ClusterConfigRule {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    pub spec: ClusterConfigSpec,
}

/// Specification section of a ClusterConfig rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ClusterConfigSpec {
    /// Signature fields added to the (hook category, pacing) grouping key.
    #[serde(default)]
    pub secondary_discriminators: Vec<Discriminator>,
    pub risk: RiskRollup,
    pub reliability: ReliabilityRollup,
}

/// Optional signature fields that split clusters further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discriminator {
    VoiceType,
    VisualDensity,
    DurationBucket,
}

/// Fatigue-risk roll-up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RiskRollup {
    /// Fatigued share of members at or above this (with at least one fatigued) → high.
    pub high_fatigued_share: f64,
}

/// Scale-reliability roll-up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReliabilityRollup {
    /// Share of voting members with a consistent high/medium potential
    /// strictly above this → reliable.
    pub reliable_share: f64,
}

impl Default for ClusterConfigSpec {
    fn default() -> Self {
        Self {
            secondary_discriminators: Vec::new(),
            risk: RiskRollup {
                high_fatigued_share: 1.0 / 3.0,
            },
            reliability: ReliabilityRollup {
                reliable_share: 0.5,
            },
        }
    }
}

// ── Compiled type ───────────────────────────────────────────────────

/// Pre-compiled cluster config (the document body is already typed).
pub type CompiledClusterConfig = ClusterConfigSpec;

impl ClusterConfigRule {
    /// Compile the YAML config.
    pub fn compile(&self) -> CompiledClusterConfig {
        self.spec.clone()
    }
}
