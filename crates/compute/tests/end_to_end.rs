//! Full pipeline over the demo fixture shipped in `data/fixtures`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use creative_compute::{AssetFixture, FatigueModel, IntelEngine, ScenarioQuery};
use creative_core::{
    AssetPopulation, ConfidenceLevel, CreativeAction, FatigueAssessment, FatigueRiskLevel,
    FatigueStatus, HookCategory, MetricPoint, PatternType, Platform, Result, ScalePotential,
    ScaleReliability, SignalType, StrategyAction, TrendSnapshot,
};
use creative_rules::RuleSet;

const FIXTURE: &str = include_str!("../../../data/fixtures/demo-assets.json");

fn population() -> AssetPopulation {
    AssetFixture::from_json(FIXTURE)
        .unwrap()
        .into_population()
        .unwrap()
}

fn engine() -> IntelEngine {
    IntelEngine::new(Arc::new(RuleSet::builtin().unwrap()))
}

#[test]
fn fixture_assessments() {
    let population = population();
    let engine = engine();
    let statuses: BTreeMap<String, FatigueStatus> = engine
        .assess_population(&population)
        .unwrap()
        .into_iter()
        .map(|a| (a.asset_id, a.status))
        .collect();

    assert_eq!(statuses["meta-ps-fast-01"], FatigueStatus::Healthy);
    assert_eq!(statuses["tiktok-ps-fast-02"], FatigueStatus::Fatigued);
    assert_eq!(statuses["yt-narr-slow-03"], FatigueStatus::Healthy);
    assert_eq!(statuses["meta-narr-slow-04"], FatigueStatus::EarlyWarning);
    assert_eq!(statuses["tiktok-eng-fast-05"], FatigueStatus::Healthy);
    assert_eq!(statuses["meta-eng-fast-06"], FatigueStatus::EarlyWarning);
}

#[test]
fn fatigued_asset_from_unsorted_rows() {
    let population = population();
    let engine = engine();
    let asset = population.get("tiktok-ps-fast-02").unwrap();
    let assessment = engine.assess(asset).unwrap();

    assert_eq!(assessment.trend.frequency, vec![1.0, 2.0, 5.0]);
    assert_eq!(assessment.trend.roas, vec![6.0, 5.0, 2.5]);
    assert_eq!(assessment.trend.ctr, vec![6.0, 5.0, 4.0]);
    assert_eq!(assessment.recommended_action, CreativeAction::RefreshCreative);
    assert_eq!(assessment.confidence, ConfidenceLevel::Medium);
    assert!(assessment.has_signal(SignalType::FrequencySaturation));
    assert!(assessment.has_signal(SignalType::CtrDecay));
    assert!(assessment.has_signal(SignalType::RoasDecline));
    assert_eq!(engine.scale_potential(asset).unwrap(), ScalePotential::Low);
}

#[test]
fn signatures_normalize_declared_hooks() {
    let population = population();
    let engine = engine();
    let sig = engine.signature(population.get("tiktok-ps-fast-02").unwrap());
    assert_eq!(sig.hook_category, HookCategory::ProblemSolving);
    let sig = engine.signature(population.get("meta-eng-fast-06").unwrap());
    assert_eq!(sig.hook_category, HookCategory::Engagement);
}

#[test]
fn fixture_clusters() {
    let population = population();
    let clusters = engine().cluster(&population).unwrap();
    assert_eq!(clusters.len(), 3);

    let labels: Vec<&str> = clusters.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Fast-Paced Engagement Creatives",
            "Fast-Paced Problem-Solution Creatives",
            "Slow-Paced Story-Driven Creatives",
        ]
    );

    let engagement = &clusters[0];
    assert_eq!(engagement.fatigue_risk_level, FatigueRiskLevel::Medium);
    assert_eq!(engagement.scale_reliability, ScaleReliability::Reliable);

    let problem_solution = &clusters[1];
    assert!(problem_solution.asset_ids.contains("meta-ps-fast-01"));
    assert!(problem_solution.asset_ids.contains("tiktok-ps-fast-02"));
    assert_eq!(problem_solution.fatigue_risk_level, FatigueRiskLevel::High);
    assert_eq!(problem_solution.scale_reliability, ScaleReliability::Unstable);

    let story = &clusters[2];
    assert_eq!(story.fatigue_risk_level, FatigueRiskLevel::Medium);
    assert_eq!(story.scale_reliability, ScaleReliability::Reliable);
}

#[test]
fn platform_summary_uses_worst_status() {
    let population = population();
    let engine = engine();
    let clusters = engine.cluster(&population).unwrap();
    let summary = engine.platform_summary(&clusters[1], &population).unwrap();

    assert_eq!(summary.fatigue_summary[&Platform::Meta], FatigueStatus::Healthy);
    assert_eq!(summary.fatigue_summary[&Platform::TikTok], FatigueStatus::Fatigued);
    assert!(summary.platform_signals[&Platform::Meta].is_empty());
    assert_eq!(
        summary.platform_signals[&Platform::TikTok],
        BTreeSet::from([
            SignalType::FrequencySaturation,
            SignalType::CtrDecay,
            SignalType::RoasDecline,
        ])
    );
    let tiktok = summary.platform_metrics[&Platform::TikTok];
    assert_eq!(tiktok.data_points, 4);
    assert!((tiktok.avg_roas - (6.1 + 6.0 + 5.0 + 2.5) / 4.0).abs() < 1e-9);
}

#[test]
fn strategy_for_mixed_cluster() {
    let population = population();
    let engine = engine();
    let clusters = engine.cluster(&population).unwrap();
    let strategy = engine.strategy_for_cluster(&clusters[1], &population).unwrap();

    assert_eq!(strategy.context.pattern_type, PatternType::PlatformSensitive);
    let actions: Vec<(Platform, StrategyAction)> = strategy
        .recommendations
        .iter()
        .map(|r| (r.platform, r.recommended_action))
        .collect();
    assert_eq!(
        actions,
        vec![
            (Platform::Meta, StrategyAction::Maintain),
            (Platform::TikTok, StrategyAction::Pause),
        ]
    );
    assert_eq!(strategy.overall_confidence, ConfidenceLevel::Medium);
    assert!(strategy.data_completeness.multi_channel_data);
    assert!(strategy
        .recommendations
        .iter()
        .all(|r| !r.traceable_intelligence.is_empty()));

    let tiktok = &strategy.recommendations[1];
    for signal in ["frequency_saturation", "ctr_decay", "roas_decline"] {
        assert!(tiktok
            .traceable_intelligence
            .contains(&format!("signal:TikTok:{signal}")));
        assert!(tiktok.rationale.contains(signal));
    }
    assert!(tiktok.rationale.contains("scale reliability is unstable"));
}

#[test]
fn refresh_recommendations_cite_their_signals() {
    let population = population();
    let engine = engine();
    for cluster in engine.cluster(&population).unwrap() {
        let strategy = engine.strategy_for_cluster(&cluster, &population).unwrap();
        for rec in &strategy.recommendations {
            if matches!(
                rec.recommended_action,
                StrategyAction::RefreshCreative | StrategyAction::Pause
            ) {
                assert!(
                    rec.traceable_intelligence.iter().any(|t| t.starts_with("signal:")
                        && !t.ends_with(":none")),
                    "{} {}: {:?}",
                    cluster.label,
                    rec.platform,
                    rec.traceable_intelligence
                );
                assert!(rec.rationale.contains("Fatigue signals:"));
            }
        }
    }
}

#[test]
fn clustering_the_fixture_twice_is_identical() {
    let population = population();
    let engine = engine();
    let first = engine.cluster(&population).unwrap();
    let second = engine.cluster(&population).unwrap();

    let shape = |clusters: &[creative_core::CreativeCluster]| {
        clusters
            .iter()
            .map(|c| (c.cluster_id.clone(), c.label.clone(), c.asset_ids.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(shape(&first), shape(&second));
    assert_eq!(first, second);
}

#[test]
fn report_covers_every_cluster_with_playbooks() {
    let population = population();
    let engine = engine();
    let report = engine.report(&population).unwrap();

    assert_eq!(report.assessments.len(), 6);
    assert_eq!(report.clusters.len(), 3);

    let mixed = &report.clusters[1];
    let ids: Vec<&str> = mixed.playbooks.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "playbook-rotate-fatigued-platform",
            "playbook-stabilize-before-scaling",
            "playbook-creative-refresh-sprint",
        ]
    );

    let story = &report.clusters[2];
    let actions: Vec<StrategyAction> = story
        .strategy
        .recommendations
        .iter()
        .map(|r| r.recommended_action)
        .collect();
    assert_eq!(actions, vec![StrategyAction::RefreshCreative, StrategyAction::Scale]);
    assert_eq!(story.analysis.member_count, 2);
}

#[test]
fn report_is_deterministic_and_serializes() {
    let population = population();
    let engine = engine();
    let first = engine.report(&population).unwrap();
    let second = engine.report(&population).unwrap();
    assert_eq!(first, second);

    let json = serde_json::to_value(&first).unwrap();
    let context = &json["clusters"][1]["strategy"]["context"];
    assert_eq!(context["fatigueSummary"]["TikTok"], "fatigued");
    assert!(context["platformMetrics"]["Meta"]["avgCTR"].is_number());
    assert_eq!(json["assessments"][1]["signals"][0]["type"], "frequency_saturation");
}

#[test]
fn playbooks_by_description() {
    let engine = engine();
    let found = engine
        .playbooks()
        .match_query(ScenarioQuery::Description("only one platform"));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "playbook-single-channel-expansion");
}

/// Model that judges every creative fatigued, to exercise the model seam.
struct AlwaysFatigued;

impl FatigueModel for AlwaysFatigued {
    fn assess(&self, asset_id: &str, _metrics: &[MetricPoint]) -> Result<FatigueAssessment> {
        Ok(FatigueAssessment {
            asset_id: asset_id.to_string(),
            status: FatigueStatus::Fatigued,
            signals: Vec::new(),
            explanation: "always fatigued".to_string(),
            confidence: ConfidenceLevel::High,
            recommended_action: CreativeAction::RefreshCreative,
            trend: TrendSnapshot::default(),
        })
    }

    fn assess_scale_potential(&self, _metrics: &[MetricPoint]) -> Result<ScalePotential> {
        Ok(ScalePotential::Low)
    }
}

#[test]
fn custom_fatigue_model_drives_the_pipeline() {
    let rules = Arc::new(RuleSet::builtin().unwrap());
    let strategy = Arc::new(creative_compute::StrategyEngine::new(&rules));
    let engine = IntelEngine::with_models(rules, Arc::new(AlwaysFatigued), strategy);

    let population = population();
    let report = engine.report(&population).unwrap();
    for cluster in &report.clusters {
        assert_eq!(cluster.cluster.fatigue_risk_level, FatigueRiskLevel::High);
        assert!(cluster
            .strategy
            .recommendations
            .iter()
            .all(|r| r.recommended_action == StrategyAction::Pause));
    }
}
