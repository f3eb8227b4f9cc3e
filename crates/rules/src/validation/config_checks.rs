//! Per-kind checks: threshold ordering, table consistency, playbook shape.

use std::collections::HashMap;

use creative_core::HookCategory;

use super::fuzzy::is_kebab_case;
use super::ValidationResult;

use crate::cluster_config::ClusterConfigRule;
use crate::fatigue_config::{ConfidenceThresholds, FatigueConfigRule};
use crate::playbook::PlaybookRule;
use crate::signature_config::{normalize_hook_type, SignatureConfigRule};
use crate::strategy_config::StrategyConfigRule;

// ── Common metadata validation ──────────────────────────────────────

fn validate_common_metadata(
    api_version: &str,
    kind: &str,
    expected_kind: &str,
    id: &str,
    result: &mut ValidationResult,
) {
    if api_version != "v1" {
        result.error(
            "apiVersion",
            format!("apiVersion must be 'v1', got '{}'", api_version),
        );
    }
    if kind != expected_kind {
        result.error(
            "kind",
            format!("kind must be '{}', got '{}'", expected_kind, kind),
        );
    }
    if !is_kebab_case(id) {
        result.error(
            "metadata.id",
            format!(
                "id must be kebab-case (lowercase alphanumeric + hyphens), got '{}'",
                id
            ),
        );
    }
}

fn validate_confidence(path: &str, c: &ConfidenceThresholds, result: &mut ValidationResult) {
    if c.medium_points > c.high_points {
        result.error(
            path,
            format!(
                "medium_points ({}) must not exceed high_points ({})",
                c.medium_points, c.high_points
            ),
        );
    }
}

// ── FatigueConfig validation ────────────────────────────────────────

pub fn validate_fatigue_config(rule: &FatigueConfigRule, result: &mut ValidationResult) {
    validate_common_metadata(
        &rule.api_version,
        &rule.kind,
        "FatigueConfig",
        &rule.metadata.id,
        result,
    );

    let spec = &rule.spec;
    if spec.min_points < 2 {
        result.error(
            "spec.min_points",
            format!("min_points must be at least 2, got {}", spec.min_points),
        );
    }
    if spec.window_size < 2 {
        result.error(
            "spec.window_size",
            format!("window_size must be at least 2, got {}", spec.window_size),
        );
    }
    if spec.decay.min_window > spec.window_size {
        result.warn(
            "spec.decay.min_window",
            format!(
                "decay.min_window ({}) exceeds window_size ({}); the decay rule can never fire",
                spec.decay.min_window, spec.window_size
            ),
        );
    }
    if spec.saturation.min_window > spec.window_size {
        result.warn(
            "spec.saturation.min_window",
            format!(
                "saturation.min_window ({}) exceeds window_size ({}); the saturation rule can never fire",
                spec.saturation.min_window, spec.window_size
            ),
        );
    }
    if !(spec.decay.ctr_drop_ratio > 0.0 && spec.decay.ctr_drop_ratio <= 1.0) {
        result.error(
            "spec.decay.ctr_drop_ratio",
            format!("ctr_drop_ratio must be in (0, 1], got {}", spec.decay.ctr_drop_ratio),
        );
    }
    let sp = &spec.scale_potential;
    if sp.weak_roas > sp.strong_roas {
        result.error(
            "spec.scale_potential",
            format!(
                "weak_roas ({}) must not exceed strong_roas ({})",
                sp.weak_roas, sp.strong_roas
            ),
        );
    }
    if sp.fresh_frequency > sp.saturated_frequency {
        result.error(
            "spec.scale_potential",
            format!(
                "fresh_frequency ({}) must not exceed saturated_frequency ({})",
                sp.fresh_frequency, sp.saturated_frequency
            ),
        );
    }
    validate_confidence("spec.confidence", &spec.confidence, result);
}

// ── SignatureConfig validation ──────────────────────────────────────

pub fn validate_signature_config(rule: &SignatureConfigRule, result: &mut ValidationResult) {
    validate_common_metadata(
        &rule.api_version,
        &rule.kind,
        "SignatureConfig",
        &rule.metadata.id,
        result,
    );

    let spec = &rule.spec;
    if spec.hook_categories.contains_key(&HookCategory::Other) {
        result.error(
            "spec.hook_categories.other",
            "'other' is the fallback category and cannot list hook types",
        );
    }

    let mut seen: HashMap<String, HookCategory> = HashMap::new();
    for (category, hooks) in &spec.hook_categories {
        for hook in hooks {
            let key = normalize_hook_type(hook);
            if key.is_empty() {
                result.error(
                    format!("spec.hook_categories.{}", category),
                    "hook type must not be empty",
                );
                continue;
            }
            if let Some(previous) = seen.insert(key.clone(), *category) {
                result.error(
                    format!("spec.hook_categories.{}", category),
                    format!("hook type '{}' is already mapped to '{}'", key, previous),
                );
            }
        }
    }

    let b = &spec.duration_buckets;
    if !(b.short_max_seconds > 0.0 && b.short_max_seconds < b.mid_max_seconds) {
        result.error(
            "spec.duration_buckets",
            format!(
                "bucket bounds must be ascending and positive: 0 < short({}) < mid({})",
                b.short_max_seconds, b.mid_max_seconds
            ),
        );
    }
}

// ── ClusterConfig validation ────────────────────────────────────────

pub fn validate_cluster_config(rule: &ClusterConfigRule, result: &mut ValidationResult) {
    validate_common_metadata(
        &rule.api_version,
        &rule.kind,
        "ClusterConfig",
        &rule.metadata.id,
        result,
    );

    let spec = &rule.spec;
    for (path, share) in [
        ("spec.risk.high_fatigued_share", spec.risk.high_fatigued_share),
        ("spec.reliability.reliable_share", spec.reliability.reliable_share),
    ] {
        if !(0.0..=1.0).contains(&share) {
            result.error(path, format!("share must be within [0, 1], got {}", share));
        }
    }

    let mut seen = Vec::new();
    for d in &spec.secondary_discriminators {
        if seen.contains(d) {
            result.warn(
                "spec.secondary_discriminators",
                format!("discriminator {:?} listed more than once", d),
            );
        }
        seen.push(*d);
    }
}

// ── StrategyConfig validation ───────────────────────────────────────

pub fn validate_strategy_config(rule: &StrategyConfigRule, result: &mut ValidationResult) {
    validate_common_metadata(
        &rule.api_version,
        &rule.kind,
        "StrategyConfig",
        &rule.metadata.id,
        result,
    );

    validate_confidence("spec.confidence", &rule.spec.confidence, result);
    if rule.spec.max_guidance_items == 0 {
        result.warn(
            "spec.max_guidance_items",
            "max_guidance_items is 0; recommendations will carry no creative guidance",
        );
    }
}

// ── Playbook validation ─────────────────────────────────────────────

pub fn validate_playbook(rule: &PlaybookRule, result: &mut ValidationResult) {
    validate_common_metadata(
        &rule.api_version,
        &rule.kind,
        "Playbook",
        &rule.metadata.id,
        result,
    );

    let spec = &rule.spec;
    if spec.title.trim().is_empty() {
        result.error("spec.title", "title must not be empty");
    }
    if spec.steps.is_empty() {
        result.error("spec.steps", "a playbook needs at least one step");
    }
    if spec.applicable_scenarios.is_empty() {
        result.warn(
            "spec.applicable_scenarios",
            "no scenario descriptions; the playbook cannot be found by text search",
        );
    }

    let when = &spec.when;
    let empty_list = when.pattern_types.as_ref().is_some_and(Vec::is_empty)
        || when.fatigue_statuses.as_ref().is_some_and(Vec::is_empty)
        || when.scale_reliability.as_ref().is_some_and(Vec::is_empty);
    if empty_list {
        result.error(
            "spec.when",
            "an empty predicate list can never match; omit the predicate instead",
        );
    }
}
