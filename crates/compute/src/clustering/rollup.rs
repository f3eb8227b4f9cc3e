//! Cluster-level roll-ups of member fatigue and scale behavior.

use creative_core::{FatigueRiskLevel, ScalePotential, ScaleReliability, StatusDistribution};
use creative_rules::cluster_config::{ReliabilityRollup, RiskRollup};

/// One member's say in the reliability roll-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberVote {
    /// Potential over the full history.
    pub potential: ScalePotential,
    /// Potential with the latest point held back, when history allows.
    pub prior: Option<ScalePotential>,
}

impl MemberVote {
    /// High or medium now, and not low one point earlier.
    fn consistently_scalable(&self) -> bool {
        self.potential != ScalePotential::Low && self.prior != Some(ScalePotential::Low)
    }

    fn flipped(&self) -> bool {
        matches!(
            (self.prior, self.potential),
            (Some(ScalePotential::High), ScalePotential::Low)
                | (Some(ScalePotential::Low), ScalePotential::High)
        )
    }
}

/// High when at least one member is fatigued and the fatigued share reaches
/// the configured bar, low when every member is healthy, medium otherwise.
pub fn fatigue_risk(statuses: &StatusDistribution, rollup: &RiskRollup) -> FatigueRiskLevel {
    let total = statuses.total();
    if total == 0 {
        return FatigueRiskLevel::Low;
    }
    let fatigued_share = statuses.fatigued as f64 / total as f64;
    if statuses.fatigued > 0 && fatigued_share >= rollup.high_fatigued_share {
        FatigueRiskLevel::High
    } else if statuses.healthy == total {
        FatigueRiskLevel::Low
    } else {
        FatigueRiskLevel::Medium
    }
}

/// Unstable when any voter flipped between high and low or voters split
/// across high and low; otherwise reliable when a majority of voters are
/// consistently scalable; moderate otherwise, including when nobody can vote.
pub fn scale_reliability(votes: &[MemberVote], rollup: &ReliabilityRollup) -> ScaleReliability {
    if votes.is_empty() {
        return ScaleReliability::Moderate;
    }

    let any_high = votes.iter().any(|v| v.potential == ScalePotential::High);
    let any_low = votes.iter().any(|v| v.potential == ScalePotential::Low);
    if votes.iter().any(MemberVote::flipped) || (any_high && any_low) {
        return ScaleReliability::Unstable;
    }

    let scalable = votes.iter().filter(|v| v.consistently_scalable()).count();
    if scalable as f64 / votes.len() as f64 > rollup.reliable_share {
        ScaleReliability::Reliable
    } else {
        ScaleReliability::Moderate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use creative_rules::cluster_config::ClusterConfigSpec;
    use ScalePotential::{High, Low, Medium};

    fn dist(healthy: usize, early_warning: usize, fatigued: usize) -> StatusDistribution {
        StatusDistribution {
            healthy,
            early_warning,
            fatigued,
        }
    }

    fn vote(potential: ScalePotential, prior: Option<ScalePotential>) -> MemberVote {
        MemberVote { potential, prior }
    }

    #[test]
    fn risk_levels() {
        let cfg = ClusterConfigSpec::default().risk;
        assert_eq!(fatigue_risk(&dist(3, 0, 0), &cfg), FatigueRiskLevel::Low);
        assert_eq!(fatigue_risk(&dist(2, 1, 0), &cfg), FatigueRiskLevel::Medium);
        assert_eq!(fatigue_risk(&dist(3, 0, 1), &cfg), FatigueRiskLevel::Medium);
        assert_eq!(fatigue_risk(&dist(2, 0, 1), &cfg), FatigueRiskLevel::High);
        assert_eq!(fatigue_risk(&dist(0, 0, 1), &cfg), FatigueRiskLevel::High);
        assert_eq!(fatigue_risk(&dist(0, 0, 0), &cfg), FatigueRiskLevel::Low);
    }

    #[test]
    fn reliable_needs_a_strict_majority() {
        let cfg = ClusterConfigSpec::default().reliability;
        let votes = [vote(High, Some(High)), vote(Medium, Some(High)), vote(Medium, Some(Low))];
        assert_eq!(scale_reliability(&votes, &cfg), ScaleReliability::Reliable);

        let votes = [
            vote(High, Some(High)),
            vote(Medium, Some(Medium)),
            vote(Medium, Some(Low)),
            vote(Medium, Some(Low)),
        ];
        assert_eq!(scale_reliability(&votes, &cfg), ScaleReliability::Moderate);
    }

    #[test]
    fn split_outweighs_a_scalable_majority() {
        let cfg = ClusterConfigSpec::default().reliability;
        let votes = [vote(High, Some(High)), vote(High, Some(High)), vote(Low, None)];
        assert_eq!(scale_reliability(&votes, &cfg), ScaleReliability::Unstable);
    }

    #[test]
    fn high_to_low_flip_outweighs_a_scalable_majority() {
        let cfg = ClusterConfigSpec::default().reliability;
        let votes = [
            vote(High, Some(High)),
            vote(Medium, Some(Medium)),
            vote(Medium, Some(Medium)),
            vote(Low, Some(High)),
        ];
        assert_eq!(scale_reliability(&votes, &cfg), ScaleReliability::Unstable);
    }

    #[test]
    fn low_to_high_flip_is_unstable() {
        let cfg = ClusterConfigSpec::default().reliability;
        let votes = [vote(High, Some(Low)), vote(Medium, Some(Medium))];
        assert_eq!(scale_reliability(&votes, &cfg), ScaleReliability::Unstable);
    }

    #[test]
    fn split_high_and_low_is_unstable() {
        let cfg = ClusterConfigSpec::default().reliability;
        let votes = [vote(High, Some(High)), vote(Low, Some(Medium))];
        assert_eq!(scale_reliability(&votes, &cfg), ScaleReliability::Unstable);
    }

    #[test]
    fn middling_votes_are_moderate() {
        let cfg = ClusterConfigSpec::default().reliability;
        let votes = [vote(Medium, Some(Medium)), vote(Low, Some(Low))];
        assert_eq!(scale_reliability(&votes, &cfg), ScaleReliability::Moderate);
        assert_eq!(scale_reliability(&[], &cfg), ScaleReliability::Moderate);
    }
}
