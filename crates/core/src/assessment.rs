use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metric::AssetId;

/// Health classification of a single creative. Ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FatigueStatus {
    Healthy,
    #[serde(alias = "warning")]
    EarlyWarning,
    Fatigued,
}

impl fmt::Display for FatigueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatigueStatus::Healthy => write!(f, "healthy"),
            FatigueStatus::EarlyWarning => write!(f, "early_warning"),
            FatigueStatus::Fatigued => write!(f, "fatigued"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    FrequencySaturation,
    CtrDecay,
    RoasDecline,
    SpendEfficiencyDrop,
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalType::FrequencySaturation => write!(f, "frequency_saturation"),
            SignalType::CtrDecay => write!(f, "ctr_decay"),
            SignalType::RoasDecline => write!(f, "roas_decline"),
            SignalType::SpendEfficiencyDrop => write!(f, "spend_efficiency_drop"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSeverity {
    Low,
    Medium,
    High,
}

/// One entry of the fatigue checklist. Undetected entries describe the healthy state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FatigueSignal {
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    pub severity: SignalSeverity,
    pub detected: bool,
    pub description: String,
}

/// Confidence attached to an assessment or recommendation. `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceLevel::Low => write!(f, "low"),
            ConfidenceLevel::Medium => write!(f, "medium"),
            ConfidenceLevel::High => write!(f, "high"),
        }
    }
}

/// Per-creative action derived from the fatigue status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreativeAction {
    Continue,
    RefreshCreative,
    PauseScaling,
}

impl CreativeAction {
    pub fn for_status(status: FatigueStatus) -> Self {
        match status {
            FatigueStatus::Healthy => CreativeAction::Continue,
            FatigueStatus::EarlyWarning => CreativeAction::PauseScaling,
            FatigueStatus::Fatigued => CreativeAction::RefreshCreative,
        }
    }
}

/// Headroom for increasing spend on a creative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalePotential {
    Low,
    Medium,
    High,
}

impl fmt::Display for ScalePotential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalePotential::Low => write!(f, "low"),
            ScalePotential::Medium => write!(f, "medium"),
            ScalePotential::High => write!(f, "high"),
        }
    }
}

/// Ordered metric values across the analysis window (oldest first).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSnapshot {
    pub ctr: Vec<f64>,
    pub roas: Vec<f64>,
    pub frequency: Vec<f64>,
    pub spend: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FatigueAssessment {
    pub asset_id: AssetId,
    pub status: FatigueStatus,
    pub signals: Vec<FatigueSignal>,
    pub explanation: String,
    pub confidence: ConfidenceLevel,
    pub recommended_action: CreativeAction,
    pub trend: TrendSnapshot,
}

impl FatigueAssessment {
    /// Signals whose rule matched.
    pub fn detected_signals(&self) -> impl Iterator<Item = &FatigueSignal> {
        self.signals.iter().filter(|s| s.detected)
    }

    pub fn has_signal(&self, signal_type: SignalType) -> bool {
        self.detected_signals().any(|s| s.signal_type == signal_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_alias_deserializes() {
        let s: FatigueStatus = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(s, FatigueStatus::EarlyWarning);
        let s: FatigueStatus = serde_json::from_str("\"early_warning\"").unwrap();
        assert_eq!(s, FatigueStatus::EarlyWarning);
    }

    #[test]
    fn status_and_confidence_ordering() {
        assert!(FatigueStatus::Fatigued > FatigueStatus::EarlyWarning);
        assert!(FatigueStatus::EarlyWarning > FatigueStatus::Healthy);
        assert_eq!(
            [ConfidenceLevel::High, ConfidenceLevel::Low, ConfidenceLevel::Medium]
                .into_iter()
                .min(),
            Some(ConfidenceLevel::Low)
        );
    }

    #[test]
    fn action_for_status() {
        assert_eq!(CreativeAction::for_status(FatigueStatus::Healthy), CreativeAction::Continue);
        assert_eq!(
            CreativeAction::for_status(FatigueStatus::EarlyWarning),
            CreativeAction::PauseScaling
        );
        assert_eq!(
            CreativeAction::for_status(FatigueStatus::Fatigued),
            CreativeAction::RefreshCreative
        );
    }

    #[test]
    fn signal_type_serializes_as_type_field() {
        let signal = FatigueSignal {
            signal_type: SignalType::CtrDecay,
            severity: SignalSeverity::Medium,
            detected: true,
            description: "ctr falling".to_string(),
        };
        let json = serde_json::to_value(&signal).unwrap();
        assert_eq!(json["type"], "ctr_decay");
        assert_eq!(json["severity"], "medium");
    }
}
