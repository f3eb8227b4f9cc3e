//! Tests for the rule loader module.

use std::fs;

use tempfile::TempDir;

use super::*;
use crate::schema::RuleKind;
use crate::RuleSet;

const STRATEGY_YAML: &str = r#"
apiVersion: v1
kind: StrategyConfig
metadata:
  id: strategy-custom
  name: Custom strategy
  enabled: true
spec:
  confidence:
    high_points: 10
    medium_points: 4
  max_guidance_items: 3
"#;

const PLAYBOOK_YAML: &str = r#"
apiVersion: v1
kind: Playbook
metadata:
  id: playbook-custom
  name: Custom playbook
spec:
  title: Custom
  description: Custom playbook for tests.
  applicable_scenarios: [Any scenario]
  steps: [Do the thing]
  expected_outcome: The thing is done.
"#;

fn temp_loader() -> (TempDir, RuleLoader) {
    let dir = TempDir::new().expect("create tempdir");
    let loader = RuleLoader::new(dir.path().to_path_buf());
    (dir, loader)
}

#[test]
fn load_rule_from_file() {
    let (dir, loader) = temp_loader();
    let path = dir.path().join("strategy.yml");
    fs::write(&path, STRATEGY_YAML).unwrap();

    let doc = loader.load_file(&path).unwrap();
    assert_eq!(doc.metadata().id, "strategy-custom");
    assert_eq!(doc.kind(), RuleKind::StrategyConfig);
    assert_eq!(doc.as_strategy_config().unwrap().spec.confidence.high_points, 10);
}

#[test]
fn load_all_skips_dotfiles_and_non_yaml() {
    let (dir, mut loader) = temp_loader();
    fs::write(dir.path().join("strategy.yml"), STRATEGY_YAML).unwrap();
    fs::write(dir.path().join(".hidden.yml"), STRATEGY_YAML).unwrap();
    fs::write(dir.path().join("readme.txt"), "not a rule").unwrap();

    let results = loader.load_all().unwrap();

    let loaded = results
        .iter()
        .filter(|r| matches!(r.status, LoadStatus::Loaded { .. }))
        .count();
    let skipped = results
        .iter()
        .filter(|r| matches!(r.status, LoadStatus::Skipped { .. }))
        .count();
    assert_eq!(loaded, 1);
    assert_eq!(skipped, 2);
    assert_eq!(loader.len(), 1);
}

#[test]
fn load_all_recurses_into_subdirectories() {
    let (dir, mut loader) = temp_loader();
    let sub = dir.path().join("playbooks");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("custom.yaml"), PLAYBOOK_YAML).unwrap();
    fs::write(dir.path().join("strategy.yml"), STRATEGY_YAML).unwrap();

    loader.load_all().unwrap();
    assert!(loader.get("playbook-custom").is_some());
    assert!(loader.get("strategy-custom").is_some());
}

#[test]
fn invalid_file_reported_but_scan_continues() {
    let (dir, mut loader) = temp_loader();
    fs::write(dir.path().join("a-broken.yml"), "apiVersion: v1\nkind: Playbook\n").unwrap();
    fs::write(dir.path().join("b-strategy.yml"), STRATEGY_YAML).unwrap();

    let results = loader.load_all().unwrap();
    assert_eq!(results.iter().filter(|r| r.is_failed()).count(), 1);
    assert_eq!(loader.len(), 1);
}

#[test]
fn semantic_validation_failure_is_a_load_failure() {
    let (dir, loader) = temp_loader();
    let path = dir.path().join("bad.yml");
    fs::write(
        &path,
        STRATEGY_YAML.replace("medium_points: 4", "medium_points: 40"),
    )
    .unwrap();

    let err = loader.load_file(&path).unwrap_err();
    assert!(matches!(err, RuleError::Validation(msg) if msg.contains("medium_points")));
}

#[test]
fn single_point_fatigue_threshold_is_a_load_failure() {
    let (dir, loader) = temp_loader();
    let path = dir.path().join("fatigue.yml");
    let shipped = include_str!("../../../../data/rules/fatigue/fatigue-config.yml");
    fs::write(&path, shipped.replace("min_points: 2", "min_points: 1")).unwrap();

    let err = loader.load_file(&path).unwrap_err();
    assert!(matches!(err, RuleError::Validation(msg) if msg.contains("min_points")));
}

#[test]
fn strict_loading_fails_on_any_error() {
    let (dir, mut loader) = temp_loader();
    fs::write(dir.path().join("broken.yml"), "{ not: [valid").unwrap();

    let err = loader.load_all_strict().unwrap_err();
    assert!(matches!(err, RuleError::LoadFailed { failed: 1, .. }));
}

#[test]
fn missing_directory_is_empty() {
    let dir = TempDir::new().unwrap();
    let mut loader = RuleLoader::new(dir.path().join("does-not-exist"));
    assert!(loader.load_all().unwrap().is_empty());
    assert!(loader.is_empty());
}

#[test]
fn rule_set_from_loader_applies_overrides() {
    let (dir, mut loader) = temp_loader();
    fs::write(dir.path().join("strategy.yml"), STRATEGY_YAML).unwrap();
    fs::write(dir.path().join("playbook.yml"), PLAYBOOK_YAML).unwrap();
    loader.load_all().unwrap();

    let set = RuleSet::from_loader(&loader);
    assert_eq!(set.strategy.confidence.high_points, 10);
    assert_eq!(set.fatigue.window_size, 3);
    assert_eq!(set.playbooks.len(), 1);
    assert_eq!(set.playbooks[0].playbook.title, "Custom");
}
