use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_json::{json, Value};

use creative_compute::{IntelEngine, ScenarioQuery};
use creative_core::{
    AssetPopulation, CreativeAsset, CreativeCluster, CreativeFeatureSignature, FatigueAssessment,
    ScalePotential,
};
use creative_rules::loader::LoadStatus;

use crate::cli::Command;
use crate::config::CliConfig;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssetReport {
    assessment: FatigueAssessment,
    scale_potential: ScalePotential,
    signature: CreativeFeatureSignature,
}

/// Run one subcommand and return its JSON output.
pub fn run(command: &Command, config: &CliConfig) -> Result<Value> {
    match command {
        Command::Rules => rules(config),
        Command::Assess { asset } => {
            let (engine, population) = load(config)?;
            assess(&engine, &population, asset.as_deref())
        }
        Command::Cluster => {
            let (engine, population) = load(config)?;
            Ok(serde_json::to_value(engine.cluster(&population)?)?)
        }
        Command::Analyze { cluster } => {
            let (engine, population) = load(config)?;
            let analyses = select_clusters(&engine, &population, cluster.as_deref())?
                .iter()
                .map(|c| engine.analyze(c, &population))
                .collect::<creative_core::Result<Vec<_>>>()?;
            Ok(serde_json::to_value(analyses)?)
        }
        Command::Strategy { cluster } => {
            let (engine, population) = load(config)?;
            let strategies = select_clusters(&engine, &population, cluster.as_deref())?
                .iter()
                .map(|c| engine.strategy_for_cluster(c, &population))
                .collect::<creative_core::Result<Vec<_>>>()?;
            Ok(serde_json::to_value(strategies)?)
        }
        Command::Playbooks { scenario, cluster } => {
            let (engine, population) = load(config)?;
            let matcher = engine.playbooks();
            let found = match (scenario, cluster) {
                (Some(text), _) => matcher.match_query(ScenarioQuery::Description(text.as_str())),
                (None, Some(id)) => {
                    let clusters = select_clusters(&engine, &population, Some(id))?;
                    let strategy = engine.strategy_for_cluster(&clusters[0], &population)?;
                    matcher.match_query(ScenarioQuery::Context(&strategy.context))
                }
                (None, None) => matcher.all().cloned().collect(),
            };
            Ok(serde_json::to_value(found)?)
        }
        Command::Report => {
            let (engine, population) = load(config)?;
            Ok(serde_json::to_value(engine.report(&population)?)?)
        }
    }
}

/// Engine over the configured rules, plus the fixture population.
fn load(config: &CliConfig) -> Result<(IntelEngine, AssetPopulation)> {
    let engine = IntelEngine::new(config.load_rules()?.into());
    let population = config.load_population()?;
    Ok((engine, population))
}

fn assess(engine: &IntelEngine, population: &AssetPopulation, asset: Option<&str>) -> Result<Value> {
    let report = |a: &CreativeAsset| -> Result<AssetReport> {
        Ok(AssetReport {
            assessment: engine.assess(a)?,
            scale_potential: engine.scale_potential(a)?,
            signature: engine.signature(a),
        })
    };

    match asset {
        Some(id) => {
            let asset = population
                .get(id)
                .with_context(|| format!("unknown asset '{id}'"))?;
            Ok(serde_json::to_value(report(asset)?)?)
        }
        None => {
            let reports = population
                .assets()
                .iter()
                .map(report)
                .collect::<Result<Vec<_>>>()?;
            Ok(serde_json::to_value(reports)?)
        }
    }
}

/// All clusters, or just the one with the given id.
fn select_clusters(
    engine: &IntelEngine,
    population: &AssetPopulation,
    id: Option<&str>,
) -> Result<Vec<CreativeCluster>> {
    let clusters = engine.cluster(population)?;
    let Some(id) = id else {
        return Ok(clusters);
    };
    let selected: Vec<CreativeCluster> = clusters.into_iter().filter(|c| c.cluster_id == id).collect();
    if selected.is_empty() {
        bail!("unknown cluster '{id}'");
    }
    Ok(selected)
}

fn rules(config: &CliConfig) -> Result<Value> {
    let (loader, results) = config.load_rule_files()?;
    let files: Vec<Value> = results
        .iter()
        .map(|r| {
            let path = r.path.display().to_string();
            match &r.status {
                LoadStatus::Loaded { rule_id } => json!({ "path": path, "status": "loaded", "ruleId": rule_id }),
                LoadStatus::Skipped { reason } => json!({ "path": path, "status": "skipped", "reason": reason }),
                LoadStatus::Failed { error } => json!({ "path": path, "status": "failed", "error": error }),
            }
        })
        .collect();
    let kinds: Vec<Value> = loader
        .documents()
        .map(|doc| {
            let meta = doc.metadata();
            json!({ "id": meta.id, "kind": doc.kind().to_string(), "enabled": meta.enabled })
        })
        .collect();

    Ok(json!({
        "rulesDir": config.rules_dir.display().to_string(),
        "files": files,
        "documents": kinds,
    }))
}
