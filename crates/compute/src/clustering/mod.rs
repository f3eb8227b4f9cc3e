//! Signature clustering: group creatives that share a signature key and
//! roll member fatigue and scale behavior up to the cluster.
//!
//! Grouping is exact-match on [`SignatureKey`], so the output depends only
//! on the population's content. Clusters come back in key order.

mod narrative;
mod rollup;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use creative_core::{
    AssetPopulation, ClusterAnalysis, CreativeAsset, CreativeCluster, FatigueStatus, IntelError,
    MetricPoint, Result, ScaleDistribution, ScalePotential, StatusDistribution,
};
use creative_rules::cluster_config::CompiledClusterConfig;
use creative_rules::fatigue_config::CompiledFatigueConfig;
use creative_rules::RuleSet;

use crate::fatigue::FatigueModel;
use crate::signature::{SignatureBuilder, SignatureKey};

pub use rollup::{fatigue_risk, scale_reliability, MemberVote};

/// Per-member results feeding the cluster roll-up.
#[derive(Debug, Clone)]
pub(crate) struct MemberEvaluation<'a> {
    pub asset: &'a CreativeAsset,
    pub key: SignatureKey,
    pub status: FatigueStatus,
    pub potential: ScalePotential,
    /// `None` when the history is too short to vote on reliability.
    pub vote: Option<MemberVote>,
}

pub struct ClusteringEngine {
    signatures: SignatureBuilder,
    config: CompiledClusterConfig,
    fatigue_config: CompiledFatigueConfig,
    model: Arc<dyn FatigueModel>,
}

impl ClusteringEngine {
    pub fn new(rules: &RuleSet, model: Arc<dyn FatigueModel>) -> Self {
        Self {
            signatures: SignatureBuilder::with_config(&rules.signature),
            config: rules.cluster.clone(),
            fatigue_config: rules.fatigue.clone(),
            model,
        }
    }

    pub fn signatures(&self) -> &SignatureBuilder {
        &self.signatures
    }

    /// Partition the population into signature clusters.
    ///
    /// Every asset lands in exactly one cluster. Fails on an empty population
    /// or on any member whose history is not date-sorted.
    pub fn cluster(&self, population: &AssetPopulation) -> Result<Vec<CreativeCluster>> {
        if population.is_empty() {
            return Err(IntelError::EmptyPopulation);
        }

        let members = self.evaluate_all(population.assets())?;
        let mut groups: BTreeMap<SignatureKey, Vec<&MemberEvaluation>> = BTreeMap::new();
        for member in &members {
            groups.entry(member.key).or_default().push(member);
        }

        let clusters: Vec<CreativeCluster> = groups
            .into_iter()
            .map(|(key, group)| self.build_cluster(key, &group))
            .collect();

        info!(
            assets = population.len(),
            clusters = clusters.len(),
            "population clustered"
        );
        Ok(clusters)
    }

    /// Aggregate statistics and insights for one cluster.
    ///
    /// Averages use each member's latest metric point; members without
    /// history are counted but do not contribute to the averages.
    pub fn analyze(&self, cluster: &CreativeCluster, population: &AssetPopulation) -> Result<ClusterAnalysis> {
        let assets = cluster
            .asset_ids
            .iter()
            .map(|id| population.get(id).ok_or_else(|| IntelError::UnknownAsset(id.clone())))
            .collect::<Result<Vec<_>>>()?;
        let members = self.evaluate_all(assets.iter().copied())?;

        let mut status_distribution = StatusDistribution::default();
        let mut scale_distribution = ScaleDistribution::default();
        for member in &members {
            status_distribution.record(member.status);
            scale_distribution.record(member.potential);
        }

        let latest: Vec<_> = assets.iter().filter_map(|a| a.metrics.last()).collect();
        let avg = |f: fn(&MetricPoint) -> f64| -> Option<f64> {
            if latest.is_empty() {
                None
            } else {
                Some(latest.iter().map(|p| f(p)).sum::<f64>() / latest.len() as f64)
            }
        };
        let avg_ctr = avg(|p| p.ctr);
        let avg_roas = avg(|p| p.roas);
        let avg_frequency = avg(|p| p.frequency);

        let cluster_insights = narrative::insights(
            &status_distribution,
            &scale_distribution,
            avg_ctr,
            avg_roas,
            avg_frequency,
            &self.fatigue_config,
            &self.config,
        );

        debug!(cluster_id = %cluster.cluster_id, members = members.len(), "cluster analyzed");

        Ok(ClusterAnalysis {
            cluster_id: cluster.cluster_id.clone(),
            label: cluster.label.clone(),
            member_count: members.len(),
            status_distribution,
            scale_distribution,
            avg_ctr,
            avg_roas,
            avg_frequency,
            cluster_insights,
        })
    }

    /// Evaluate members in parallel; results keep input order.
    fn evaluate_all<'a, I>(&self, assets: I) -> Result<Vec<MemberEvaluation<'a>>>
    where
        I: IntoIterator<Item = &'a CreativeAsset>,
    {
        let assets: Vec<&CreativeAsset> = assets.into_iter().collect();
        assets
            .par_iter()
            .map(|&asset| self.evaluate(asset))
            .collect()
    }

    fn evaluate<'a>(&self, asset: &'a CreativeAsset) -> Result<MemberEvaluation<'a>> {
        let signature = self.signatures.for_asset(asset);
        let key = SignatureKey::from_signature(&signature, &self.config.secondary_discriminators);
        let assessment = self.model.assess(&asset.id, &asset.metrics)?;
        let potential = self.model.assess_scale_potential(&asset.metrics)?;

        let vote = match asset.metrics.len() {
            0 | 1 => None,
            2 => Some(MemberVote { potential, prior: None }),
            n => Some(MemberVote {
                potential,
                prior: Some(self.model.assess_scale_potential(&asset.metrics[..n - 1])?),
            }),
        };

        Ok(MemberEvaluation {
            asset,
            key,
            status: assessment.status,
            potential,
            vote,
        })
    }

    fn build_cluster(&self, key: SignatureKey, group: &[&MemberEvaluation]) -> CreativeCluster {
        let mut statuses = StatusDistribution::default();
        let mut scale = ScaleDistribution::default();
        for member in group {
            statuses.record(member.status);
            scale.record(member.potential);
        }
        let votes: Vec<MemberVote> = group.iter().filter_map(|m| m.vote).collect();

        let risk = fatigue_risk(&statuses, &self.config.risk);
        let reliability = scale_reliability(&votes, &self.config.reliability);
        let asset_ids: BTreeSet<String> = group.iter().map(|m| m.asset.id.clone()).collect();

        debug!(
            cluster = %key.slug(),
            members = asset_ids.len(),
            risk = %risk,
            reliability = %reliability,
            "cluster built"
        );

        CreativeCluster {
            cluster_id: key.cluster_id(),
            label: narrative::label(&key),
            defining_features: key.defining_features(),
            asset_ids,
            fatigue_risk_level: risk,
            scale_reliability: reliability,
            explanation: narrative::explanation(&key, &statuses, &scale, risk, reliability),
            usage_guidance: narrative::usage_guidance(risk, reliability),
        }
    }
}
