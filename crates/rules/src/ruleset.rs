//! Compiled, read-only rule set handed to the analyzers.
//!
//! One compiled config per kind plus the ordered playbook registry. Built once
//! (from the shipped defaults or a loaded directory) and shared behind an `Arc`.

use tracing::{debug, warn};

use crate::cluster_config::{ClusterConfigSpec, CompiledClusterConfig};
use crate::fatigue_config::{CompiledFatigueConfig, FatigueConfigSpec};
use crate::loader::{parse_document, Result, RuleLoader};
use crate::playbook::CompiledPlaybook;
use crate::schema::{RuleDocument, RuleKind};
use crate::signature_config::CompiledSignatureConfig;
use crate::strategy_config::{CompiledStrategyConfig, StrategyConfigSpec};

/// Rule documents shipped with the crate, embedded at compile time.
const BUILTIN_RULES: [&str; 9] = [
    include_str!("../../../data/rules/fatigue/fatigue-config.yml"),
    include_str!("../../../data/rules/signature/signature-config.yml"),
    include_str!("../../../data/rules/clustering/cluster-config.yml"),
    include_str!("../../../data/rules/strategy/strategy-config.yml"),
    include_str!("../../../data/rules/playbooks/scale-proven-winners.yml"),
    include_str!("../../../data/rules/playbooks/rotate-fatigued-platform.yml"),
    include_str!("../../../data/rules/playbooks/creative-refresh-sprint.yml"),
    include_str!("../../../data/rules/playbooks/stabilize-before-scaling.yml"),
    include_str!("../../../data/rules/playbooks/single-channel-expansion.yml"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    pub fatigue: CompiledFatigueConfig,
    pub signature: CompiledSignatureConfig,
    pub cluster: CompiledClusterConfig,
    pub strategy: CompiledStrategyConfig,
    /// Playbook registry in rule-id order.
    pub playbooks: Vec<CompiledPlaybook>,
}

impl Default for RuleSet {
    /// Compiled-in defaults with an empty playbook registry.
    fn default() -> Self {
        Self {
            fatigue: FatigueConfigSpec::default(),
            signature: CompiledSignatureConfig::default(),
            cluster: ClusterConfigSpec::default(),
            strategy: StrategyConfigSpec::default(),
            playbooks: Vec::new(),
        }
    }
}

impl RuleSet {
    /// Parse the embedded rule documents shipped under `data/rules`.
    pub fn builtin() -> Result<Self> {
        let docs = BUILTIN_RULES
            .iter()
            .map(|yaml| parse_document(yaml))
            .collect::<Result<Vec<_>>>()?;
        let mut sorted: Vec<&RuleDocument> = docs.iter().collect();
        sorted.sort_by(|a, b| a.metadata().id.cmp(&b.metadata().id));
        Ok(Self::from_documents(sorted))
    }

    /// Build from documents already loaded by a [`RuleLoader`].
    pub fn from_loader(loader: &RuleLoader) -> Self {
        Self::from_documents(loader.documents())
    }

    /// Compile a set of documents. Disabled documents are ignored. When several
    /// enabled documents of the same config kind exist, the last one in
    /// iteration order wins; kinds with no document keep their defaults.
    pub fn from_documents<'a>(docs: impl IntoIterator<Item = &'a RuleDocument>) -> Self {
        let mut set = Self::default();
        let mut seen: Vec<RuleKind> = Vec::new();

        for doc in docs {
            let meta = doc.metadata();
            if !meta.enabled {
                debug!(rule_id = %meta.id, "skipping disabled rule");
                continue;
            }
            let kind = doc.kind();
            if kind != RuleKind::Playbook && seen.contains(&kind) {
                warn!(rule_id = %meta.id, kind = %kind, "multiple enabled configs of one kind; overriding");
            }
            seen.push(kind);

            match doc {
                RuleDocument::FatigueConfig(rule) => set.fatigue = rule.compile(),
                RuleDocument::SignatureConfig(rule) => set.signature = rule.compile(),
                RuleDocument::ClusterConfig(rule) => set.cluster = rule.compile(),
                RuleDocument::StrategyConfig(rule) => set.strategy = rule.compile(),
                RuleDocument::Playbook(rule) => set.playbooks.push(rule.compile()),
            }
        }

        set
    }

    /// Look up a playbook by id.
    pub fn playbook(&self, id: &str) -> Option<&CompiledPlaybook> {
        self.playbooks.iter().find(|p| p.playbook.id == id)
    }
}
