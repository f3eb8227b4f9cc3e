use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::assessment::{ConfidenceLevel, FatigueStatus};
use crate::cluster::{ClusterId, ScaleReliability};
use crate::creative::Platform;

/// How consistently a cluster behaves across platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    CrossPlatformStable,
    PlatformSensitive,
    PlatformSpecific,
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternType::CrossPlatformStable => write!(f, "cross_platform_stable"),
            PatternType::PlatformSensitive => write!(f, "platform_sensitive"),
            PatternType::PlatformSpecific => write!(f, "platform_specific"),
        }
    }
}

/// Averaged delivery metrics for a cluster on one platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformMetrics {
    #[serde(rename = "avgCTR")]
    pub avg_ctr: f64,
    #[serde(rename = "avgROAS")]
    pub avg_roas: f64,
    pub avg_frequency: f64,
    /// Number of metric points behind the averages.
    #[serde(default)]
    pub data_points: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyContext {
    pub cluster_id: ClusterId,
    pub pattern_type: PatternType,
    pub fatigue_summary: BTreeMap<Platform, FatigueStatus>,
    pub scale_reliability: ScaleReliability,
    pub platform_metrics: BTreeMap<Platform, PlatformMetrics>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyAction {
    Scale,
    Maintain,
    RefreshCreative,
    Pause,
}

impl fmt::Display for StrategyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyAction::Scale => write!(f, "scale"),
            StrategyAction::Maintain => write!(f, "maintain"),
            StrategyAction::RefreshCreative => write!(f, "refresh_creative"),
            StrategyAction::Pause => write!(f, "pause"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyRecommendation {
    pub platform: Platform,
    pub recommended_action: StrategyAction,
    pub rationale: String,
    pub creative_guidance: Vec<String>,
    pub confidence_level: ConfidenceLevel,
    /// References to the signals and rules behind the recommendation.
    pub traceable_intelligence: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCompleteness {
    pub fatigue_data: bool,
    pub cluster_data: bool,
    pub multi_channel_data: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyOutput {
    pub cluster_id: ClusterId,
    pub cluster_label: String,
    pub context: StrategyContext,
    pub recommendations: Vec<StrategyRecommendation>,
    pub overall_confidence: ConfidenceLevel,
    pub strategy_explanation: String,
    pub data_completeness: DataCompleteness,
}

/// Static, ordered-step response to a recognised scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPlaybook {
    pub id: String,
    pub title: String,
    pub description: String,
    pub applicable_scenarios: Vec<String>,
    pub steps: Vec<String>,
    pub expected_outcome: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_metrics_wire_names() {
        let m = PlatformMetrics {
            avg_ctr: 2.0,
            avg_roas: 3.5,
            avg_frequency: 1.8,
            data_points: 6,
        };
        let json = serde_json::to_value(m).unwrap();
        assert_eq!(json["avgCTR"], 2.0);
        assert_eq!(json["avgROAS"], 3.5);
        assert_eq!(json["avgFrequency"], 1.8);
    }

    #[test]
    fn context_maps_key_by_platform_name() {
        let mut summary = BTreeMap::new();
        summary.insert(Platform::TikTok, FatigueStatus::Fatigued);
        summary.insert(Platform::Meta, FatigueStatus::Healthy);
        let ctx = StrategyContext {
            cluster_id: "c1".to_string(),
            pattern_type: PatternType::PlatformSensitive,
            fatigue_summary: summary,
            scale_reliability: ScaleReliability::Moderate,
            platform_metrics: BTreeMap::new(),
        };
        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json["fatigueSummary"]["TikTok"], "fatigued");
        assert_eq!(json["patternType"], "platform_sensitive");
    }
}
