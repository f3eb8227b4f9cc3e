use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use creative_core::{
    ActionPlaybook, AssetPopulation, ClusterAnalysis, CreativeAsset, CreativeCluster,
    CreativeFeatureSignature, FatigueAssessment, FatigueStatus, IntelError, Platform,
    PlatformMetrics, Result, ScalePotential, SignalType, StrategyOutput,
};
use creative_rules::RuleSet;

use crate::clustering::ClusteringEngine;
use crate::fatigue::{FatigueDetector, FatigueModel};
use crate::playbook::PlaybookMatcher;
use crate::strategy::{PlatformSignals, StrategyEngine, StrategyModel};

/// Fatigue status, detected signals and averaged metrics per platform for
/// one cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSummary {
    pub fatigue_summary: BTreeMap<Platform, FatigueStatus>,
    /// Signals detected on the members that set each platform's status.
    pub platform_signals: PlatformSignals,
    pub platform_metrics: BTreeMap<Platform, PlatformMetrics>,
}

/// Everything known about one cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterReport {
    pub cluster: CreativeCluster,
    pub analysis: ClusterAnalysis,
    pub strategy: StrategyOutput,
    pub playbooks: Vec<ActionPlaybook>,
}

/// Full run over a population.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntelReport {
    pub assessments: Vec<FatigueAssessment>,
    pub clusters: Vec<ClusterReport>,
}

/// Wires the analyzers to one compiled rule set.
pub struct IntelEngine {
    rules: Arc<RuleSet>,
    fatigue: Arc<dyn FatigueModel>,
    strategy: Arc<dyn StrategyModel>,
    clustering: ClusteringEngine,
    playbooks: PlaybookMatcher,
}

impl IntelEngine {
    /// Engine with the rule-based fatigue and strategy models.
    pub fn new(rules: Arc<RuleSet>) -> Self {
        let fatigue: Arc<dyn FatigueModel> = Arc::new(FatigueDetector::with_config(&rules.fatigue));
        let strategy: Arc<dyn StrategyModel> = Arc::new(StrategyEngine::new(&rules));
        Self::with_models(rules, fatigue, strategy)
    }

    /// Engine with caller-supplied models.
    pub fn with_models(
        rules: Arc<RuleSet>,
        fatigue: Arc<dyn FatigueModel>,
        strategy: Arc<dyn StrategyModel>,
    ) -> Self {
        Self {
            clustering: ClusteringEngine::new(&rules, fatigue.clone()),
            playbooks: PlaybookMatcher::new(&rules),
            rules,
            fatigue,
            strategy,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn playbooks(&self) -> &PlaybookMatcher {
        &self.playbooks
    }

    pub fn assess(&self, asset: &CreativeAsset) -> Result<FatigueAssessment> {
        self.fatigue.assess(&asset.id, &asset.metrics)
    }

    pub fn scale_potential(&self, asset: &CreativeAsset) -> Result<ScalePotential> {
        self.fatigue.assess_scale_potential(&asset.metrics)
    }

    pub fn signature(&self, asset: &CreativeAsset) -> CreativeFeatureSignature {
        self.clustering.signatures().for_asset(asset)
    }

    /// Assess every asset in population order.
    pub fn assess_population(&self, population: &AssetPopulation) -> Result<Vec<FatigueAssessment>> {
        population.assets().iter().map(|a| self.assess(a)).collect()
    }

    pub fn cluster(&self, population: &AssetPopulation) -> Result<Vec<CreativeCluster>> {
        self.clustering.cluster(population)
    }

    pub fn analyze(&self, cluster: &CreativeCluster, population: &AssetPopulation) -> Result<ClusterAnalysis> {
        self.clustering.analyze(cluster, population)
    }

    /// Per-platform roll-up of a cluster's members.
    ///
    /// A platform's status is the worst status among its members that have
    /// enough history to be judged, and its signals are the detected signals
    /// of those worst members. Metrics average every point of every member
    /// on the platform.
    pub fn platform_summary(&self, cluster: &CreativeCluster, population: &AssetPopulation) -> Result<PlatformSummary> {
        let min_points = self.rules.fatigue.min_points;
        let mut summary = PlatformSummary::default();
        let mut sums: BTreeMap<Platform, (f64, f64, f64, usize)> = BTreeMap::new();

        for id in &cluster.asset_ids {
            let asset = population
                .get(id)
                .ok_or_else(|| IntelError::UnknownAsset(id.clone()))?;

            if asset.metrics.len() >= min_points {
                let assessment = self.assess(asset)?;
                let detected: BTreeSet<SignalType> =
                    assessment.detected_signals().map(|s| s.signal_type).collect();
                let worst = summary
                    .fatigue_summary
                    .entry(asset.platform)
                    .or_insert(assessment.status);
                let signals = summary.platform_signals.entry(asset.platform).or_default();
                if assessment.status > *worst {
                    *worst = assessment.status;
                    *signals = detected;
                } else if assessment.status == *worst {
                    signals.extend(detected);
                }
            }

            if !asset.metrics.is_empty() {
                let entry = sums.entry(asset.platform).or_default();
                for point in &asset.metrics {
                    entry.0 += point.ctr;
                    entry.1 += point.roas;
                    entry.2 += point.frequency;
                    entry.3 += 1;
                }
            }
        }

        summary.platform_metrics = sums
            .into_iter()
            .map(|(platform, (ctr, roas, frequency, n))| {
                let n_f = n as f64;
                (
                    platform,
                    PlatformMetrics {
                        avg_ctr: ctr / n_f,
                        avg_roas: roas / n_f,
                        avg_frequency: frequency / n_f,
                        data_points: n,
                    },
                )
            })
            .collect();
        Ok(summary)
    }

    pub fn strategy(
        &self,
        cluster: &CreativeCluster,
        fatigue_summary: &BTreeMap<Platform, FatigueStatus>,
        platform_signals: &PlatformSignals,
        platform_metrics: &BTreeMap<Platform, PlatformMetrics>,
    ) -> StrategyOutput {
        self.strategy
            .generate_strategy(cluster, fatigue_summary, platform_signals, platform_metrics)
    }

    /// Strategy for a cluster using the population to build the platform roll-up.
    pub fn strategy_for_cluster(&self, cluster: &CreativeCluster, population: &AssetPopulation) -> Result<StrategyOutput> {
        let summary = self.platform_summary(cluster, population)?;
        Ok(self.strategy(
            cluster,
            &summary.fatigue_summary,
            &summary.platform_signals,
            &summary.platform_metrics,
        ))
    }

    /// Cluster, analyze, recommend and match playbooks for every cluster.
    pub fn report(&self, population: &AssetPopulation) -> Result<IntelReport> {
        let assessments = self.assess_population(population)?;
        let clusters = self.cluster(population)?;

        let clusters = clusters
            .into_iter()
            .map(|cluster| -> Result<ClusterReport> {
                let analysis = self.analyze(&cluster, population)?;
                let strategy = self.strategy_for_cluster(&cluster, population)?;
                let playbooks = self.playbooks.match_context(&strategy.context);
                Ok(ClusterReport {
                    cluster,
                    analysis,
                    strategy,
                    playbooks,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            assets = assessments.len(),
            clusters = clusters.len(),
            "intelligence report built"
        );
        Ok(IntelReport {
            assessments,
            clusters,
        })
    }
}
