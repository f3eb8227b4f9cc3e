use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::assessment::{FatigueStatus, ScalePotential};
use crate::metric::AssetId;

pub type ClusterId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FatigueRiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for FatigueRiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatigueRiskLevel::Low => write!(f, "low"),
            FatigueRiskLevel::Medium => write!(f, "medium"),
            FatigueRiskLevel::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleReliability {
    Unstable,
    Moderate,
    Reliable,
}

impl fmt::Display for ScaleReliability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleReliability::Unstable => write!(f, "unstable"),
            ScaleReliability::Moderate => write!(f, "moderate"),
            ScaleReliability::Reliable => write!(f, "reliable"),
        }
    }
}

/// A group of creatives sharing a signature key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeCluster {
    pub cluster_id: ClusterId,
    pub label: String,
    /// Feature keys such as `hook:problem-solving` or `pacing:fast`.
    pub defining_features: BTreeSet<String>,
    pub asset_ids: BTreeSet<AssetId>,
    pub fatigue_risk_level: FatigueRiskLevel,
    pub scale_reliability: ScaleReliability,
    pub explanation: String,
    pub usage_guidance: Vec<String>,
}

/// Count of members per fatigue status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDistribution {
    pub healthy: usize,
    pub early_warning: usize,
    pub fatigued: usize,
}

impl StatusDistribution {
    pub fn record(&mut self, status: FatigueStatus) {
        match status {
            FatigueStatus::Healthy => self.healthy += 1,
            FatigueStatus::EarlyWarning => self.early_warning += 1,
            FatigueStatus::Fatigued => self.fatigued += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.healthy + self.early_warning + self.fatigued
    }
}

/// Count of members per scale potential.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl ScaleDistribution {
    pub fn record(&mut self, potential: ScalePotential) {
        match potential {
            ScalePotential::High => self.high += 1,
            ScalePotential::Medium => self.medium += 1,
            ScalePotential::Low => self.low += 1,
        }
    }
}

/// Aggregate statistics and narrative for one cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterAnalysis {
    pub cluster_id: ClusterId,
    pub label: String,
    pub member_count: usize,
    pub status_distribution: StatusDistribution,
    pub scale_distribution: ScaleDistribution,
    /// Means over each member's latest metric point; `None` when no member has data.
    pub avg_ctr: Option<f64>,
    pub avg_roas: Option<f64>,
    pub avg_frequency: Option<f64>,
    pub cluster_insights: Vec<String>,
}
