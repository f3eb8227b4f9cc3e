//! Playbook rule kind: static, ordered-step responses keyed by scenario
//! predicates over a strategy context.

use serde::{Deserialize, Serialize};

use creative_core::{ActionPlaybook, FatigueStatus, PatternType, ScaleReliability};

use crate::schema::CommonMetadata;

// ── YAML-level types ────────────────────────────────────────────────

/// Top-level Playbook rule document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PlaybookRule {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    pub spec: PlaybookSpec,
}

/// Specification section of a Playbook rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PlaybookSpec {
    pub title: String,
    pub description: String,
    /// Human-readable scenario descriptions (also used for text matching).
    pub applicable_scenarios: Vec<String>,
    /// Predicates over a strategy context. Omitted predicates are unconstrained.
    #[serde(default)]
    pub when: ScenarioPredicates,
    pub steps: Vec<String>,
    pub expected_outcome: String,
}

/// Scenario predicate set. A playbook applies when every present predicate holds.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScenarioPredicates {
    #[serde(default)]
    pub pattern_types: Option<Vec<PatternType>>,
    #[serde(default)]
    pub fatigue_statuses: Option<Vec<FatigueStatus>>,
    /// Whether any or all platform statuses must fall in `fatigue_statuses`.
    #[serde(default)]
    pub fatigue_match: StatusMatch,
    #[serde(default)]
    pub scale_reliability: Option<Vec<ScaleReliability>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusMatch {
    #[default]
    Any,
    All,
}

impl ScenarioPredicates {
    /// Number of constrained predicates; used to rank matches by specificity.
    pub fn specificity(&self) -> usize {
        [
            self.pattern_types.is_some(),
            self.fatigue_statuses.is_some(),
            self.scale_reliability.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}

// ── Compiled type ───────────────────────────────────────────────────

/// A playbook ready for matching: the consumer-facing record plus its predicates.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPlaybook {
    pub playbook: ActionPlaybook,
    pub when: ScenarioPredicates,
}

impl PlaybookRule {
    /// Compile into the consumer-facing [`ActionPlaybook`] record.
    pub fn compile(&self) -> CompiledPlaybook {
        CompiledPlaybook {
            playbook: ActionPlaybook {
                id: self.metadata.id.clone(),
                title: self.spec.title.clone(),
                description: self.spec.description.clone(),
                applicable_scenarios: self.spec.applicable_scenarios.clone(),
                steps: self.spec.steps.clone(),
                expected_outcome: self.spec.expected_outcome.clone(),
            },
            when: self.spec.when.clone(),
        }
    }
}
