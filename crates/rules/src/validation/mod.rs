//! Rule validation with structured errors and suggestions.
//!
//! Validates every rule kind (FatigueConfig, SignatureConfig, ClusterConfig,
//! StrategyConfig, Playbook). Returns a [`ValidationResult`] with errors
//! (block loading) and warnings (advisory).

pub(crate) mod config_checks;
pub(crate) mod fuzzy;

use serde::{Deserialize, Serialize};

use crate::schema::{RuleDocument, RuleEnvelope, RuleKind};

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// A blocking validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Path-like location, e.g. `"spec.decay.ctr_drop_ratio"`.
    pub path: String,
    pub message: String,
    /// Optional "Did you mean …?" suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// A non-blocking advisory warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        });
    }

    pub(crate) fn error_with_suggestion(
        &mut self,
        path: impl Into<String>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: Some(suggestion.into()),
        });
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
        });
    }

    /// Join all error messages into one line for error reporting.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// ── Public API ──────────────────────────────────────────────────────

const KNOWN_KINDS: [&str; 5] = [
    "FatigueConfig",
    "SignatureConfig",
    "ClusterConfig",
    "StrategyConfig",
    "Playbook",
];

/// Validate any [`RuleDocument`] variant, dispatching to the appropriate validator.
pub fn validate_document(doc: &RuleDocument) -> ValidationResult {
    let mut result = ValidationResult::new();
    match doc {
        RuleDocument::FatigueConfig(rule) => {
            config_checks::validate_fatigue_config(rule, &mut result);
        }
        RuleDocument::SignatureConfig(rule) => {
            config_checks::validate_signature_config(rule, &mut result);
        }
        RuleDocument::ClusterConfig(rule) => {
            config_checks::validate_cluster_config(rule, &mut result);
        }
        RuleDocument::StrategyConfig(rule) => {
            config_checks::validate_strategy_config(rule, &mut result);
        }
        RuleDocument::Playbook(rule) => {
            config_checks::validate_playbook(rule, &mut result);
        }
    }
    result
}

/// Parse raw YAML of any kind and validate. Parse errors are reported as errors.
pub fn validate_yaml(yaml: &str) -> ValidationResult {
    let envelope: RuleEnvelope = match serde_yaml::from_str(yaml) {
        Ok(env) => env,
        Err(e) => {
            let mut result = ValidationResult::new();
            result.error("", format!("YAML parse error: {e}"));
            return result;
        }
    };

    if envelope.kind.parse::<RuleKind>().is_err() {
        let mut result = ValidationResult::new();
        let message = format!("unknown rule kind '{}'", envelope.kind);
        match fuzzy::closest(&envelope.kind, &KNOWN_KINDS) {
            Some(s) => result.error_with_suggestion("kind", message, format!("did you mean '{s}'?")),
            None => result.error("kind", message),
        }
        return result;
    }

    match envelope.parse_full() {
        Ok(doc) => validate_document(&doc),
        Err(e) => {
            let mut result = ValidationResult::new();
            result.error("spec", e);
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FATIGUE: &str = include_str!("../../../../data/rules/fatigue/fatigue-config.yml");
    const SIGNATURE: &str = include_str!("../../../../data/rules/signature/signature-config.yml");

    #[test]
    fn shipped_fatigue_config_is_valid() {
        let result = validate_yaml(FATIGUE);
        assert!(result.valid, "{}", result.error_summary());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn single_point_min_points_rejected() {
        let yaml = FATIGUE.replace("min_points: 2", "min_points: 1");
        let result = validate_yaml(&yaml);
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.path == "spec.min_points"));
    }

    #[test]
    fn shipped_signature_config_is_valid() {
        let result = validate_yaml(SIGNATURE);
        assert!(result.valid, "{}", result.error_summary());
    }

    #[test]
    fn misspelled_kind_gets_suggestion() {
        let yaml = FATIGUE.replace("kind: FatigueConfig", "kind: FatigueConfg");
        let result = validate_yaml(&yaml);
        assert!(!result.valid);
        assert_eq!(
            result.errors[0].suggestion.as_deref(),
            Some("did you mean 'FatigueConfig'?")
        );
    }

    #[test]
    fn inverted_duration_buckets_rejected() {
        let yaml = SIGNATURE
            .replace("short_max_seconds: 20.0", "short_max_seconds: 60.0");
        let result = validate_yaml(&yaml);
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.path == "spec.duration_buckets"));
    }

    #[test]
    fn duplicate_hook_type_rejected() {
        let yaml = SIGNATURE.replacen("- poll", "- story", 1);
        let result = validate_yaml(&yaml);
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.message.contains("'story'")));
    }

    #[test]
    fn non_kebab_id_rejected() {
        let yaml = FATIGUE.replace("id: fatigue-default", "id: Fatigue_Default");
        let result = validate_yaml(&yaml);
        assert!(result.errors.iter().any(|e| e.path == "metadata.id"));
    }

    #[test]
    fn playbook_without_steps_rejected() {
        let yaml = r#"
apiVersion: v1
kind: Playbook
metadata:
  id: playbook-empty
  name: Empty
spec:
  title: Empty
  description: Nothing to do.
  applicable_scenarios: [Never]
  steps: []
  expected_outcome: Nothing.
"#;
        let result = validate_yaml(yaml);
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.path == "spec.steps"));
    }
}
