//! Human-readable cluster labels, explanations, guidance and insights.

use creative_core::{
    FatigueRiskLevel, HookCategory, Pacing, ScaleDistribution, ScaleReliability,
    StatusDistribution,
};
use creative_rules::cluster_config::CompiledClusterConfig;
use creative_rules::fatigue_config::CompiledFatigueConfig;

use crate::signature::SignatureKey;

fn hook_label(category: HookCategory) -> &'static str {
    match category {
        HookCategory::Engagement => "Engagement",
        HookCategory::ProblemSolving => "Problem-Solution",
        HookCategory::Narrative => "Story-Driven",
        HookCategory::Attention => "Attention-Grabbing",
        HookCategory::Other => "Mixed-Hook",
    }
}

fn pacing_label(pacing: Pacing) -> &'static str {
    match pacing {
        Pacing::Fast => "Fast-Paced",
        Pacing::Medium => "Medium-Paced",
        Pacing::Slow => "Slow-Paced",
    }
}

/// e.g. "Fast-Paced Problem-Solution Creatives", with secondary fields in parentheses.
pub(super) fn label(key: &SignatureKey) -> String {
    let base = format!("{} {} Creatives", pacing_label(key.pacing), hook_label(key.hook_category));
    let mut extra = Vec::new();
    if let Some(voice) = key.voice_type {
        extra.push(voice.as_str());
    }
    if let Some(density) = key.visual_density {
        extra.push(density.as_str());
    }
    if let Some(bucket) = key.duration_bucket {
        extra.push(bucket.as_str());
    }
    if extra.is_empty() {
        base
    } else {
        format!("{base} ({})", extra.join(", "))
    }
}

pub(super) fn explanation(
    key: &SignatureKey,
    statuses: &StatusDistribution,
    scale: &ScaleDistribution,
    risk: FatigueRiskLevel,
    reliability: ScaleReliability,
) -> String {
    let members = statuses.total();
    format!(
        "{members} creative{} sharing a {} hook with {} pacing. \
         Fatigue: {} healthy, {} early warning, {} fatigued, so fatigue risk is {risk}. \
         Scale potential: {} high, {} medium, {} low, so scaling is {reliability}.",
        if members == 1 { "" } else { "s" },
        key.hook_category,
        key.pacing.as_str(),
        statuses.healthy,
        statuses.early_warning,
        statuses.fatigued,
        scale.high,
        scale.medium,
        scale.low,
    )
}

pub(super) fn usage_guidance(risk: FatigueRiskLevel, reliability: ScaleReliability) -> Vec<String> {
    let lines: &[&str] = match (risk, reliability) {
        (FatigueRiskLevel::Low, ScaleReliability::Reliable) => &[
            "Prioritize this format for budget increases",
            "Use it as the control when testing new creatives",
        ],
        (FatigueRiskLevel::Low, ScaleReliability::Moderate) => &[
            "Keep in rotation at current budget",
            "Scale only the strongest member and watch ROAS",
        ],
        (FatigueRiskLevel::Low, ScaleReliability::Unstable) => &[
            "Hold budgets flat until scale behavior settles",
            "Raise budget on one member at a time",
        ],
        (FatigueRiskLevel::Medium, ScaleReliability::Reliable) => &[
            "Scale cautiously while monitoring frequency",
            "Prepare fresh hook variants before wear-out",
        ],
        (FatigueRiskLevel::Medium, ScaleReliability::Moderate) => &[
            "Hold budgets and refresh members showing early warnings",
            "Test a new hook within the same format",
        ],
        (FatigueRiskLevel::Medium, ScaleReliability::Unstable) => &[
            "Avoid budget increases on this format",
            "Refresh members showing early warnings",
        ],
        (FatigueRiskLevel::High, ScaleReliability::Reliable) => &[
            "Refresh hooks before adding budget; the format still scales",
            "Cap frequency on fatigued placements",
        ],
        (FatigueRiskLevel::High, ScaleReliability::Moderate) => &[
            "Limit new spend on this format",
            "Replace fatigued members with new hook variants",
        ],
        (FatigueRiskLevel::High, ScaleReliability::Unstable) => &[
            "Pause scaling on this format",
            "Rebuild with a different hook or pacing before relaunch",
        ],
    };
    lines.iter().map(|line| line.to_string()).collect()
}

/// Insights from the cluster averages, using the same thresholds as the
/// per-asset fatigue rules.
pub(super) fn insights(
    statuses: &StatusDistribution,
    scale: &ScaleDistribution,
    avg_ctr: Option<f64>,
    avg_roas: Option<f64>,
    avg_frequency: Option<f64>,
    fatigue: &CompiledFatigueConfig,
    cluster: &CompiledClusterConfig,
) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(freq) = avg_frequency {
        if freq > fatigue.signals.saturation_frequency {
            out.push(format!(
                "Average frequency {freq:.1} is above {:.1}; audiences are saturating",
                fatigue.signals.saturation_frequency
            ));
        }
    }
    if let (Some(ctr), Some(roas)) = (avg_ctr, avg_roas) {
        if ctr > fatigue.signals.mismatch_ctr && roas < fatigue.signals.mismatch_roas {
            out.push(format!(
                "Average CTR {ctr:.2}% is strong but ROAS {roas:.2} is weak; check landing page and offer fit"
            ));
        }
    }
    if let Some(roas) = avg_roas {
        if roas < fatigue.scale_potential.weak_roas {
            out.push(format!(
                "Average ROAS {roas:.2} is below the {:.1} floor",
                fatigue.scale_potential.weak_roas
            ));
        } else if roas > fatigue.scale_potential.strong_roas {
            out.push(format!(
                "Average ROAS {roas:.2} clears the {:.1} scaling bar",
                fatigue.scale_potential.strong_roas
            ));
        }
    }

    let total = statuses.total();
    if total > 0 {
        if statuses.fatigued > 0
            && statuses.fatigued as f64 / total as f64 >= cluster.risk.high_fatigued_share
        {
            out.push(format!("{} of {total} members are fatigued", statuses.fatigued));
        } else if statuses.healthy == total {
            out.push("All members are healthy".to_string());
        }
        if scale.high * 2 > total {
            out.push("Most members show high scale potential".to_string());
        } else if scale.low * 2 > total {
            out.push("Most members show low scale potential".to_string());
        }
    }

    if out.is_empty() {
        out.push("No threshold crossed; performance is within normal ranges".to_string());
    }
    out
}
