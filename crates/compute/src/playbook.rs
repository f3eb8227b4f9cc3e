//! Playbook lookup by strategy context or free-text scenario.

use creative_core::{ActionPlaybook, StrategyContext};
use creative_rules::playbook::{CompiledPlaybook, ScenarioPredicates, StatusMatch};
use creative_rules::RuleSet;

/// What to match playbooks against.
#[derive(Debug, Clone, Copy)]
pub enum ScenarioQuery<'a> {
    Context(&'a StrategyContext),
    Description(&'a str),
}

#[derive(Debug, Clone, Default)]
pub struct PlaybookMatcher {
    playbooks: Vec<CompiledPlaybook>,
}

impl PlaybookMatcher {
    pub fn new(rules: &RuleSet) -> Self {
        Self {
            playbooks: rules.playbooks.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.playbooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playbooks.is_empty()
    }

    /// All registered playbooks in registry order.
    pub fn all(&self) -> impl Iterator<Item = &ActionPlaybook> {
        self.playbooks.iter().map(|p| &p.playbook)
    }

    pub fn match_query(&self, query: ScenarioQuery<'_>) -> Vec<ActionPlaybook> {
        match query {
            ScenarioQuery::Context(context) => self.match_context(context),
            ScenarioQuery::Description(text) => self.match_description(text),
        }
    }

    /// Playbooks whose predicates all hold for the context, most specific
    /// first; ties keep registry order.
    pub fn match_context(&self, context: &StrategyContext) -> Vec<ActionPlaybook> {
        let mut matched: Vec<&CompiledPlaybook> = self
            .playbooks
            .iter()
            .filter(|p| predicates_hold(&p.when, context))
            .collect();
        matched.sort_by_key(|p| std::cmp::Reverse(p.when.specificity()));
        matched.into_iter().map(|p| p.playbook.clone()).collect()
    }

    /// Case-insensitive substring match against title, description and
    /// applicable scenarios, in registry order. Blank text matches nothing.
    pub fn match_description(&self, text: &str) -> Vec<ActionPlaybook> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.playbooks
            .iter()
            .map(|p| &p.playbook)
            .filter(|p| {
                p.title.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
                    || p.applicable_scenarios
                        .iter()
                        .any(|s| s.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }
}

fn predicates_hold(when: &ScenarioPredicates, context: &StrategyContext) -> bool {
    if let Some(patterns) = &when.pattern_types {
        if !patterns.contains(&context.pattern_type) {
            return false;
        }
    }
    if let Some(reliability) = &when.scale_reliability {
        if !reliability.contains(&context.scale_reliability) {
            return false;
        }
    }
    if let Some(statuses) = &when.fatigue_statuses {
        let mut observed = context.fatigue_summary.values();
        let holds = match when.fatigue_match {
            StatusMatch::Any => observed.any(|s| statuses.contains(s)),
            StatusMatch::All => {
                !context.fatigue_summary.is_empty() && observed.all(|s| statuses.contains(s))
            }
        };
        if !holds {
            return false;
        }
    }
    true
}
