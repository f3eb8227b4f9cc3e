//! Rule-based fatigue detection and scale-potential scoring.
//!
//! Classification runs over the trailing window of a date-sorted history:
//!
//! 1. Saturation: ROAS fell and frequency rose across the window. Fatigued
//!    when latest frequency and ROAS both cross their limits, otherwise an
//!    early warning.
//! 2. Decay: CTR never rose across the window and the latest value sits
//!    below `ctr_drop_ratio` of the first. Fatigued when frequency is high,
//!    otherwise an early warning.
//! 3. Anything else is healthy.
//!
//! Histories shorter than `min_points` are healthy with low confidence and
//! carry no signals.

use tracing::debug;

use creative_core::{
    ensure_sorted, ConfidenceLevel, CreativeAction, FatigueAssessment, FatigueSignal,
    FatigueStatus, IntelError, MetricPoint, Result, ScalePotential, SignalSeverity, SignalType,
    TrendSnapshot,
};
use creative_rules::fatigue_config::{CompiledFatigueConfig, ConfidenceThresholds};

/// Pluggable per-asset fatigue model.
pub trait FatigueModel: Send + Sync {
    /// Classify one asset's date-sorted history.
    fn assess(&self, asset_id: &str, metrics: &[MetricPoint]) -> Result<FatigueAssessment>;

    /// Judge how safely the asset could absorb more budget.
    fn assess_scale_potential(&self, metrics: &[MetricPoint]) -> Result<ScalePotential>;
}

/// Map a data-point count onto a confidence level.
pub fn confidence_for(points: usize, thresholds: &ConfidenceThresholds) -> ConfidenceLevel {
    if points >= thresholds.high_points {
        ConfidenceLevel::High
    } else if points >= thresholds.medium_points {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

/// Which cascade rule decided the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    InsufficientData,
    Saturation,
    Decay,
    Stable,
}

pub struct FatigueDetector {
    config: CompiledFatigueConfig,
}

impl Default for FatigueDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FatigueDetector {
    /// Detector with the compiled-in default thresholds.
    pub fn new() -> Self {
        Self {
            config: CompiledFatigueConfig::default(),
        }
    }

    /// Detector from a compiled FatigueConfig.
    pub fn with_config(config: &CompiledFatigueConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn config(&self) -> &CompiledFatigueConfig {
        &self.config
    }

    fn window<'a>(&self, metrics: &'a [MetricPoint]) -> &'a [MetricPoint] {
        &metrics[metrics.len().saturating_sub(self.config.window_size)..]
    }

    fn is_saturating(&self, window: &[MetricPoint]) -> bool {
        let (Some(first), Some(last)) = (window.first(), window.last()) else {
            return false;
        };
        window.len() >= self.config.saturation.min_window
            && first.roas > last.roas
            && last.frequency > first.frequency
    }

    fn is_decaying(&self, window: &[MetricPoint]) -> bool {
        let (Some(first), Some(last)) = (window.first(), window.last()) else {
            return false;
        };
        window.len() >= self.config.decay.min_window
            && window.windows(2).all(|pair| pair[1].ctr <= pair[0].ctr)
            && last.ctr < self.config.decay.ctr_drop_ratio * first.ctr
    }

    fn classify(&self, metrics: &[MetricPoint]) -> (FatigueStatus, Verdict) {
        if metrics.len() < self.config.min_points {
            return (FatigueStatus::Healthy, Verdict::InsufficientData);
        }
        let window = self.window(metrics);
        let Some(latest) = window.last() else {
            return (FatigueStatus::Healthy, Verdict::InsufficientData);
        };

        if self.is_saturating(window) {
            let sat = &self.config.saturation;
            let status = if latest.frequency > sat.fatigued_frequency && latest.roas < sat.fatigued_roas {
                FatigueStatus::Fatigued
            } else {
                FatigueStatus::EarlyWarning
            };
            return (status, Verdict::Saturation);
        }

        if self.is_decaying(window) {
            let status = if latest.frequency > self.config.decay.fatigued_frequency {
                FatigueStatus::Fatigued
            } else {
                FatigueStatus::EarlyWarning
            };
            return (status, Verdict::Decay);
        }

        (FatigueStatus::Healthy, Verdict::Stable)
    }

    /// Evaluate the fixed signal checklist over the window.
    fn signals(&self, window: &[MetricPoint]) -> Vec<FatigueSignal> {
        let (Some(first), Some(latest)) = (window.first(), window.last()) else {
            return Vec::new();
        };
        let thresholds = &self.config.signals;

        let saturated = latest.frequency > thresholds.saturation_frequency;
        let frequency = FatigueSignal {
            signal_type: SignalType::FrequencySaturation,
            severity: if saturated { SignalSeverity::High } else { SignalSeverity::Low },
            detected: saturated,
            description: if saturated {
                format!(
                    "Frequency {:.1} exceeds {:.1}; the audience is seeing this creative too often",
                    latest.frequency, thresholds.saturation_frequency
                )
            } else {
                format!(
                    "Frequency {:.1} is within the {:.1} limit",
                    latest.frequency, thresholds.saturation_frequency
                )
            },
        };

        let decaying = self.is_decaying(window);
        let ctr = FatigueSignal {
            signal_type: SignalType::CtrDecay,
            severity: match (decaying, latest.frequency > self.config.decay.fatigued_frequency) {
                (false, _) => SignalSeverity::Low,
                (true, false) => SignalSeverity::Medium,
                (true, true) => SignalSeverity::High,
            },
            detected: decaying,
            description: if decaying {
                format!(
                    "CTR fell from {:.2}% to {:.2}% without recovering",
                    first.ctr, latest.ctr
                )
            } else {
                format!("CTR moved from {:.2}% to {:.2}%", first.ctr, latest.ctr)
            },
        };

        let declining = first.roas > latest.roas;
        let roas = FatigueSignal {
            signal_type: SignalType::RoasDecline,
            severity: match (declining, latest.roas < self.config.saturation.fatigued_roas) {
                (false, _) => SignalSeverity::Low,
                (true, false) => SignalSeverity::Medium,
                (true, true) => SignalSeverity::High,
            },
            detected: declining,
            description: if declining {
                format!("ROAS declined from {:.2} to {:.2}", first.roas, latest.roas)
            } else {
                format!("ROAS held from {:.2} to {:.2}", first.roas, latest.roas)
            },
        };

        let mismatch =
            latest.ctr > thresholds.mismatch_ctr && latest.roas < thresholds.mismatch_roas;
        let efficiency = FatigueSignal {
            signal_type: SignalType::SpendEfficiencyDrop,
            severity: if mismatch { SignalSeverity::Medium } else { SignalSeverity::Low },
            detected: mismatch,
            description: if mismatch {
                format!(
                    "CTR {:.2}% is strong but ROAS {:.2} is weak; clicks are not converting",
                    latest.ctr, latest.roas
                )
            } else {
                "Clicks and returns are in line".to_string()
            },
        };

        vec![frequency, ctr, roas, efficiency]
    }

    fn explain(&self, status: FatigueStatus, verdict: Verdict, metrics: &[MetricPoint]) -> String {
        let window = self.window(metrics);
        let (Some(first), Some(latest)) = (window.first(), window.last()) else {
            return "No metric history; treating the creative as healthy until data arrives."
                .to_string();
        };

        match verdict {
            Verdict::InsufficientData => format!(
                "Only {} data point(s); at least {} are needed to judge fatigue.",
                metrics.len(),
                self.config.min_points
            ),
            Verdict::Saturation => {
                let head = format!(
                    "ROAS fell from {:.2} to {:.2} while frequency rose from {:.1} to {:.1}",
                    first.roas, latest.roas, first.frequency, latest.frequency
                );
                if status == FatigueStatus::Fatigued {
                    format!(
                        "{head}. Frequency above {:.1} with ROAS below {:.1} means the audience is saturated.",
                        self.config.saturation.fatigued_frequency,
                        self.config.saturation.fatigued_roas
                    )
                } else {
                    format!("{head}. Returns are slipping as the audience sees the creative more often.")
                }
            }
            Verdict::Decay => {
                let head = format!(
                    "CTR decayed from {:.2}% to {:.2}% over the last {} points",
                    first.ctr,
                    latest.ctr,
                    window.len()
                );
                if status == FatigueStatus::Fatigued {
                    format!(
                        "{head}, with frequency at {:.1}. The creative has worn out.",
                        latest.frequency
                    )
                } else {
                    format!(
                        "{head}. Frequency is still {:.1}, so there is time to prepare a refresh.",
                        latest.frequency
                    )
                }
            }
            Verdict::Stable => format!(
                "No saturation or decay pattern over the last {} points; ROAS {:.2}, CTR {:.2}%, frequency {:.1}.",
                window.len(),
                latest.roas,
                latest.ctr,
                latest.frequency
            ),
        }
    }

    fn snapshot(&self, metrics: &[MetricPoint]) -> TrendSnapshot {
        let window = self.window(metrics);
        TrendSnapshot {
            ctr: window.iter().map(|p| p.ctr).collect(),
            roas: window.iter().map(|p| p.roas).collect(),
            frequency: window.iter().map(|p| p.frequency).collect(),
            spend: window.iter().map(|p| p.spend).collect(),
        }
    }
}

impl FatigueModel for FatigueDetector {
    fn assess(&self, asset_id: &str, metrics: &[MetricPoint]) -> Result<FatigueAssessment> {
        ensure_sorted(metrics)?;
        if let Some(stray) = metrics.iter().find(|p| p.asset_id != asset_id) {
            return Err(IntelError::PreconditionViolated(format!(
                "metric point for '{}' passed in the history of '{asset_id}'",
                stray.asset_id
            )));
        }

        let (status, verdict) = self.classify(metrics);
        let signals = if verdict == Verdict::InsufficientData {
            Vec::new()
        } else {
            self.signals(self.window(metrics))
        };
        let confidence = if verdict == Verdict::InsufficientData {
            ConfidenceLevel::Low
        } else {
            confidence_for(metrics.len(), &self.config.confidence)
        };

        debug!(
            asset_id,
            points = metrics.len(),
            status = %status,
            "fatigue assessed"
        );

        Ok(FatigueAssessment {
            asset_id: asset_id.to_string(),
            status,
            explanation: self.explain(status, verdict, metrics),
            signals,
            confidence,
            recommended_action: CreativeAction::for_status(status),
            trend: self.snapshot(metrics),
        })
    }

    fn assess_scale_potential(&self, metrics: &[MetricPoint]) -> Result<ScalePotential> {
        ensure_sorted(metrics)?;
        let [.., prev, latest] = metrics else {
            return Ok(ScalePotential::Medium);
        };
        let sp = &self.config.scale_potential;

        // A zero prior ROAS gives inf or NaN, which is never stable.
        let stable = (latest.roas - prev.roas).abs() / prev.roas < sp.stable_roas_delta;
        let spend_up = latest.spend > prev.spend;
        let strong = latest.roas > sp.strong_roas;

        if strong && ((stable && spend_up) || latest.frequency < sp.fresh_frequency) {
            Ok(ScalePotential::High)
        } else if latest.roas < sp.weak_roas || latest.frequency > sp.saturated_frequency {
            Ok(ScalePotential::Low)
        } else {
            Ok(ScalePotential::Medium)
        }
    }
}
