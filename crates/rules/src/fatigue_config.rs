//! FatigueConfig rule kind: classification cascade thresholds, risk-signal
//! thresholds, scale-potential thresholds and confidence calibration.

use serde::{Deserialize, Serialize};

use crate::schema::CommonMetadata;

// ── YAML-level types ────────────────────────────────────────────────

/// Top-level FatigueConfig rule document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FatigueConfigRule {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    pub spec: FatigueConfigSpec,
}

/// Specification section of a FatigueConfig rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FatigueConfigSpec {
    /// Number of trailing points inspected by the cascade.
    pub window_size: usize,
    /// Minimum number of points before any rule runs.
    pub min_points: usize,
    pub saturation: SaturationThresholds,
    pub decay: DecayThresholds,
    pub signals: SignalThresholds,
    pub scale_potential: ScalePotentialThresholds,
    pub confidence: ConfidenceThresholds,
}

/// Saturation rule: ROAS falling while frequency rises.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SaturationThresholds {
    /// Minimum window length for the rule to apply.
    pub min_window: usize,
    /// latest frequency > this (together with `fatigued_roas`) → fatigued.
    pub fatigued_frequency: f64,
    /// latest roas < this (together with `fatigued_frequency`) → fatigued.
    pub fatigued_roas: f64,
}

/// Decay rule: CTR monotonically non-increasing and well below the window start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DecayThresholds {
    pub min_window: usize,
    /// latest ctr < ratio × first ctr.
    pub ctr_drop_ratio: f64,
    /// latest frequency > this → fatigued, else early warning.
    pub fatigued_frequency: f64,
}

/// Risk-signal checklist thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SignalThresholds {
    /// latest frequency > this → frequency_saturation.
    pub saturation_frequency: f64,
    /// latest ctr > this and latest roas < `mismatch_roas` → conversion mismatch.
    pub mismatch_ctr: f64,
    pub mismatch_roas: f64,
}

/// Scale-potential thresholds (evaluated over the last two points).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScalePotentialThresholds {
    /// |Δroas| / roas[first] below this counts as stable.
    pub stable_roas_delta: f64,
    /// latest roas > this is required for High.
    pub strong_roas: f64,
    /// latest frequency < this, with strong roas → High.
    pub fresh_frequency: f64,
    /// latest roas < this → Low.
    pub weak_roas: f64,
    /// latest frequency > this → Low.
    pub saturated_frequency: f64,
}

/// Data-point counts required for each confidence level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfidenceThresholds {
    /// points >= this → high.
    pub high_points: usize,
    /// points >= this → medium, otherwise low.
    pub medium_points: usize,
}

impl Default for FatigueConfigSpec {
    fn default() -> Self {
        Self {
            window_size: 3,
            min_points: 2,
            saturation: SaturationThresholds {
                min_window: 2,
                fatigued_frequency: 4.0,
                fatigued_roas: 3.0,
            },
            decay: DecayThresholds {
                min_window: 3,
                ctr_drop_ratio: 0.8,
                fatigued_frequency: 3.0,
            },
            signals: SignalThresholds {
                saturation_frequency: 4.0,
                mismatch_ctr: 5.0,
                mismatch_roas: 3.0,
            },
            scale_potential: ScalePotentialThresholds {
                stable_roas_delta: 0.10,
                strong_roas: 4.0,
                fresh_frequency: 2.0,
                weak_roas: 3.0,
                saturated_frequency: 4.0,
            },
            confidence: ConfidenceThresholds::default(),
        }
    }
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high_points: 7,
            medium_points: 3,
        }
    }
}

// ── Compiled type ───────────────────────────────────────────────────

/// Pre-compiled fatigue config (the document body is already typed).
pub type CompiledFatigueConfig = FatigueConfigSpec;

impl FatigueConfigRule {
    /// Compile the YAML config.
    pub fn compile(&self) -> CompiledFatigueConfig {
        self.spec.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = include_str!("../../../data/rules/fatigue/fatigue-config.yml");

    #[test]
    fn parse_fatigue_config_yaml() {
        let rule: FatigueConfigRule = serde_yaml::from_str(YAML).unwrap();
        assert_eq!(rule.kind, "FatigueConfig");
        assert_eq!(rule.spec.window_size, 3);
        assert_eq!(rule.spec.decay.ctr_drop_ratio, 0.8);
    }

    #[test]
    fn shipped_yaml_matches_compiled_defaults() {
        let rule: FatigueConfigRule = serde_yaml::from_str(YAML).unwrap();
        assert_eq!(rule.compile(), FatigueConfigSpec::default());
    }

    #[test]
    fn unknown_field_rejected() {
        let yaml = YAML.replace("window_size: 3", "window_size: 3\n  window_sise: 4");
        assert!(serde_yaml::from_str::<FatigueConfigRule>(&yaml).is_err());
    }
}
