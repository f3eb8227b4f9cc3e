//! Per-platform strategy recommendations for a cluster.
//!
//! The action for each platform comes from a fixed table over that
//! platform's fatigue status and the cluster's scale reliability. Every
//! recommendation records the rule, cluster facts, detected fatigue signals
//! and averaged-metric checks it was derived from.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use creative_core::{
    ConfidenceLevel, CreativeCluster, DataCompleteness, FatigueStatus, HookCategory, PatternType,
    Platform, PlatformMetrics, ScaleReliability, SignalType, StrategyAction, StrategyContext,
    StrategyOutput, StrategyRecommendation,
};
use creative_rules::fatigue_config::CompiledFatigueConfig;
use creative_rules::strategy_config::CompiledStrategyConfig;
use creative_rules::RuleSet;

use crate::fatigue::confidence_for;

/// Fatigue signal types detected on each platform's worst-status members.
pub type PlatformSignals = BTreeMap<Platform, BTreeSet<SignalType>>;

/// Pluggable strategy model.
pub trait StrategyModel: Send + Sync {
    fn generate_strategy(
        &self,
        cluster: &CreativeCluster,
        fatigue_summary: &BTreeMap<Platform, FatigueStatus>,
        platform_signals: &PlatformSignals,
        platform_metrics: &BTreeMap<Platform, PlatformMetrics>,
    ) -> StrategyOutput;
}

/// Classify how a cluster's fatigue varies across platforms.
///
/// Fewer than two platforms is platform-specific; identical statuses
/// everywhere is cross-platform stable; anything else is platform-sensitive.
pub fn pattern_type(fatigue_summary: &BTreeMap<Platform, FatigueStatus>) -> PatternType {
    let mut statuses = fatigue_summary.values();
    match (statuses.next(), fatigue_summary.len()) {
        (Some(first), n) if n >= 2 => {
            if statuses.all(|s| s == first) {
                PatternType::CrossPlatformStable
            } else {
                PatternType::PlatformSensitive
            }
        }
        _ => PatternType::PlatformSpecific,
    }
}

/// The recommendation table.
pub fn recommended_action(status: FatigueStatus, reliability: ScaleReliability) -> StrategyAction {
    match (status, reliability) {
        (FatigueStatus::Healthy, ScaleReliability::Reliable) => StrategyAction::Scale,
        (FatigueStatus::Healthy, ScaleReliability::Moderate | ScaleReliability::Unstable) => {
            StrategyAction::Maintain
        }
        (FatigueStatus::EarlyWarning, _) => StrategyAction::RefreshCreative,
        (FatigueStatus::Fatigued, _) => StrategyAction::Pause,
    }
}

/// What is known about one platform of a cluster.
struct PlatformFacts<'a> {
    platform: Platform,
    status: Option<FatigueStatus>,
    detected: Option<&'a BTreeSet<SignalType>>,
    metrics: Option<&'a PlatformMetrics>,
}

pub struct StrategyEngine {
    config: CompiledStrategyConfig,
    fatigue: CompiledFatigueConfig,
}

impl StrategyEngine {
    pub fn new(rules: &RuleSet) -> Self {
        Self {
            config: rules.strategy.clone(),
            fatigue: rules.fatigue.clone(),
        }
    }

    /// Threshold checks over a platform's averaged metrics, judged with the
    /// per-asset fatigue thresholds. These are level checks, not trends.
    fn metric_checks(&self, metrics: &PlatformMetrics) -> Vec<(&'static str, String)> {
        let signals = &self.fatigue.signals;
        let mut out = Vec::new();
        if metrics.avg_frequency > signals.saturation_frequency {
            out.push((
                "avg_frequency_high",
                format!(
                    "avgFrequency={:.2}>{:.1}",
                    metrics.avg_frequency, signals.saturation_frequency
                ),
            ));
        }
        if metrics.avg_ctr > signals.mismatch_ctr && metrics.avg_roas < signals.mismatch_roas {
            out.push((
                "ctr_roas_mismatch",
                format!(
                    "avgCTR={:.2}>{:.1},avgROAS={:.2}<{:.1}",
                    metrics.avg_ctr, signals.mismatch_ctr, metrics.avg_roas, signals.mismatch_roas
                ),
            ));
        }
        if metrics.avg_roas < self.fatigue.scale_potential.weak_roas {
            out.push((
                "avg_roas_low",
                format!(
                    "avgROAS={:.2}<{:.1}",
                    metrics.avg_roas, self.fatigue.scale_potential.weak_roas
                ),
            ));
        }
        out
    }

    fn recommend(
        &self,
        facts: PlatformFacts<'_>,
        cluster: &CreativeCluster,
        pattern: PatternType,
        healthy_elsewhere: &[Platform],
    ) -> StrategyRecommendation {
        let PlatformFacts {
            platform,
            status,
            detected,
            metrics,
        } = facts;
        let reliability = cluster.scale_reliability;
        let risk = cluster.fatigue_risk_level;
        let action = status.map_or(StrategyAction::Maintain, |s| recommended_action(s, reliability));
        let detected: Vec<SignalType> = detected.into_iter().flatten().copied().collect();
        let checks = metrics.map(|m| self.metric_checks(m)).unwrap_or_default();

        let mut trace = vec![match status {
            Some(s) => format!("rule:{s}+{reliability}->{action}"),
            None => format!("rule:no_fatigue_data->{action}"),
        }];
        trace.push(format!("cluster:{}:fatigue_risk={risk}", cluster.cluster_id));
        trace.push(format!("cluster:{}:scale_reliability={reliability}", cluster.cluster_id));
        trace.push(format!("pattern:{pattern}"));
        if detected.is_empty() {
            trace.push(format!("signal:{platform}:none"));
        } else {
            trace.extend(detected.iter().map(|kind| format!("signal:{platform}:{kind}")));
        }
        trace.extend(checks.iter().map(|(name, detail)| format!("metric:{name}({detail})")));
        trace.push(match metrics {
            Some(m) => format!("metrics:{platform}:data_points={}", m.data_points),
            None => format!("metrics:{platform}:missing"),
        });

        let mut rationale = match status {
            Some(FatigueStatus::Healthy) if action == StrategyAction::Scale => format!(
                "{platform} is healthy and the cluster scales reliably, so budget can grow."
            ),
            Some(FatigueStatus::Healthy) => format!(
                "{platform} is healthy but scaling is {reliability}; hold budget until it proves out."
            ),
            Some(FatigueStatus::EarlyWarning) => format!(
                "{platform} shows early fatigue; refresh the creative before performance drops."
            ),
            Some(FatigueStatus::Fatigued) => {
                format!("{platform} is fatigued; pause spend and replace the creative.")
            }
            None => format!(
                "No fatigue data for {platform}; maintain current settings until it arrives."
            ),
        };
        if !detected.is_empty() {
            let names: Vec<String> = detected.iter().map(|kind| kind.to_string()).collect();
            rationale.push_str(&format!(" Fatigue signals: {}.", names.join(", ")));
        } else if status.is_some() {
            rationale.push_str(" No fatigue signals detected.");
        }
        if status != Some(FatigueStatus::Healthy) {
            rationale.push_str(&format!(
                " Cluster scale reliability is {reliability} with {risk} fatigue risk."
            ));
        }
        if let Some(m) = metrics {
            rationale.push_str(&format!(
                " Avg ROAS {:.2}, CTR {:.2}%, frequency {:.1} over {} point(s).",
                m.avg_roas, m.avg_ctr, m.avg_frequency, m.data_points
            ));
        }
        if !checks.is_empty() {
            let names: Vec<&str> = checks.iter().map(|(name, _)| *name).collect();
            rationale.push_str(&format!(" Metric checks: {}.", names.join(", ")));
        }

        let confidence_level = match (status, metrics) {
            (Some(_), Some(m)) => confidence_for(m.data_points, &self.config.confidence),
            _ => ConfidenceLevel::Low,
        };

        let mut creative_guidance = guidance(action, platform, cluster, healthy_elsewhere);
        creative_guidance.truncate(self.config.max_guidance_items);

        StrategyRecommendation {
            platform,
            recommended_action: action,
            rationale,
            creative_guidance,
            confidence_level,
            traceable_intelligence: trace,
        }
    }
}

impl StrategyModel for StrategyEngine {
    fn generate_strategy(
        &self,
        cluster: &CreativeCluster,
        fatigue_summary: &BTreeMap<Platform, FatigueStatus>,
        platform_signals: &PlatformSignals,
        platform_metrics: &BTreeMap<Platform, PlatformMetrics>,
    ) -> StrategyOutput {
        let pattern = pattern_type(fatigue_summary);
        let platforms: BTreeSet<Platform> = fatigue_summary
            .keys()
            .chain(platform_metrics.keys())
            .copied()
            .collect();
        let healthy: Vec<Platform> = fatigue_summary
            .iter()
            .filter(|(_, s)| **s == FatigueStatus::Healthy)
            .map(|(p, _)| *p)
            .collect();

        let recommendations: Vec<StrategyRecommendation> = platforms
            .iter()
            .map(|&platform| {
                let facts = PlatformFacts {
                    platform,
                    status: fatigue_summary.get(&platform).copied(),
                    detected: platform_signals.get(&platform),
                    metrics: platform_metrics.get(&platform),
                };
                self.recommend(facts, cluster, pattern, &healthy)
            })
            .collect();

        let data_completeness = DataCompleteness {
            fatigue_data: !fatigue_summary.is_empty(),
            cluster_data: !cluster.asset_ids.is_empty(),
            multi_channel_data: platform_metrics.len() > 1,
        };
        let overall_confidence = if data_completeness.fatigue_data && data_completeness.cluster_data {
            recommendations
                .iter()
                .map(|r| r.confidence_level)
                .min()
                .unwrap_or(ConfidenceLevel::Low)
        } else {
            ConfidenceLevel::Low
        };

        let strategy_explanation = explain(
            cluster,
            pattern,
            &recommendations,
            overall_confidence,
            &data_completeness,
        );

        debug!(
            cluster_id = %cluster.cluster_id,
            platforms = recommendations.len(),
            pattern = %pattern,
            confidence = %overall_confidence,
            "strategy generated"
        );

        StrategyOutput {
            cluster_id: cluster.cluster_id.clone(),
            cluster_label: cluster.label.clone(),
            context: StrategyContext {
                cluster_id: cluster.cluster_id.clone(),
                pattern_type: pattern,
                fatigue_summary: fatigue_summary.clone(),
                scale_reliability: cluster.scale_reliability,
                platform_metrics: platform_metrics.clone(),
            },
            recommendations,
            overall_confidence,
            strategy_explanation,
            data_completeness,
        }
    }
}

/// Value of a `field:value` defining feature, if present.
fn defining_value<'a>(cluster: &'a CreativeCluster, field: &str) -> Option<&'a str> {
    cluster.defining_features.iter().find_map(|f| {
        f.split_once(':')
            .filter(|(name, _)| *name == field)
            .map(|(_, value)| value)
    })
}

/// A hook family to test instead of the cluster's own.
fn alternative_hook(current: Option<&str>) -> HookCategory {
    [
        HookCategory::Engagement,
        HookCategory::ProblemSolving,
        HookCategory::Narrative,
        HookCategory::Attention,
    ]
    .into_iter()
    .find(|h| Some(h.as_str()) != current)
    .unwrap_or(HookCategory::Engagement)
}

fn guidance(
    action: StrategyAction,
    platform: Platform,
    cluster: &CreativeCluster,
    healthy_elsewhere: &[Platform],
) -> Vec<String> {
    let hook = defining_value(cluster, "hook");
    let pacing = defining_value(cluster, "pacing").unwrap_or("current");
    let alt = alternative_hook(hook);
    let hook = hook.unwrap_or("current");

    let mut out = match action {
        StrategyAction::Scale => vec![
            format!("Keep the {hook} hook and {pacing} pacing that define this cluster"),
            "Raise budget in 20-30% steps and watch frequency".to_string(),
            format!("Duplicate the top performer into a new {platform} ad set"),
        ],
        StrategyAction::Maintain => vec![
            format!("Hold budget on {platform} and review weekly"),
            format!("Queue a {alt} hook variant as a backup"),
        ],
        StrategyAction::RefreshCreative => vec![
            format!("Test a {alt} hook while keeping {pacing} pacing"),
            "Rework the first three seconds before the audience wears out".to_string(),
            "Rotate in a new visual treatment".to_string(),
        ],
        StrategyAction::Pause => vec![
            format!("Pause spend on {platform} until a refreshed variant is ready"),
            format!("Rebuild around a {alt} hook"),
        ],
    };

    let others: Vec<String> = healthy_elsewhere
        .iter()
        .filter(|p| **p != platform)
        .map(|p| p.to_string())
        .collect();
    if matches!(action, StrategyAction::RefreshCreative | StrategyAction::Pause) && !others.is_empty() {
        out.push(format!(
            "Borrow what is working on {} where this cluster is still healthy",
            others.join(", ")
        ));
    }
    out
}

fn explain(
    cluster: &CreativeCluster,
    pattern: PatternType,
    recommendations: &[StrategyRecommendation],
    confidence: ConfidenceLevel,
    completeness: &DataCompleteness,
) -> String {
    let shape = match pattern {
        PatternType::CrossPlatformStable => "performs consistently across platforms",
        PatternType::PlatformSensitive => "behaves differently by platform",
        PatternType::PlatformSpecific if completeness.fatigue_data => "has fatigue data from a single platform",
        PatternType::PlatformSpecific => "has no platform fatigue data yet",
    };
    let mut text = format!("{} {shape}.", cluster.label);

    let mut by_action: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for rec in recommendations {
        by_action
            .entry(rec.recommended_action.to_string())
            .or_default()
            .push(rec.platform.to_string());
    }
    if !by_action.is_empty() {
        let parts: Vec<String> = by_action
            .iter()
            .map(|(action, platforms)| format!("{action} on {}", platforms.join(", ")))
            .collect();
        text.push_str(&format!(" Recommended: {}.", parts.join("; ")));
    }

    text.push_str(&format!(" Overall confidence is {confidence}."));
    if !completeness.fatigue_data {
        text.push_str(" Fatigue data is missing, so recommendations are provisional.");
    }
    if !completeness.cluster_data {
        text.push_str(" The cluster has no members.");
    }
    text
}
