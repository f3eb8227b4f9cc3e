//! SignatureConfig rule kind: declared hook-type lookup table and
//! duration bucket boundaries for the signature builder.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use creative_core::HookCategory;

use crate::schema::CommonMetadata;

// ── YAML-level types ────────────────────────────────────────────────

/// Top-level SignatureConfig rule document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SignatureConfigRule {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    pub spec: SignatureConfigSpec,
}

/// Specification section of a SignatureConfig rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SignatureConfigSpec {
    /// Declared hook-type strings per category. Anything unlisted maps to `other`.
    pub hook_categories: BTreeMap<HookCategory, Vec<String>>,
    pub duration_buckets: DurationBuckets,
}

/// Duration bucket upper bounds in seconds (inclusive).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DurationBuckets {
    /// duration <= this → short.
    pub short_max_seconds: f64,
    /// duration <= this → mid, above → long.
    pub mid_max_seconds: f64,
}

impl Default for SignatureConfigSpec {
    fn default() -> Self {
        let table: [(HookCategory, &[&str]); 4] = [
            (
                HookCategory::Engagement,
                &["question", "poll", "challenge", "quiz", "interactive", "call-out"],
            ),
            (
                HookCategory::ProblemSolving,
                &["problem-solution", "pain-point", "before-after", "how-to", "demo", "tutorial"],
            ),
            (
                HookCategory::Narrative,
                &["story", "testimonial", "day-in-the-life", "behind-the-scenes", "unboxing"],
            ),
            (
                HookCategory::Attention,
                &["bold-claim", "pattern-interrupt", "shock", "statistic", "visual-hook", "trend"],
            ),
        ];
        Self {
            hook_categories: table
                .into_iter()
                .map(|(cat, hooks)| (cat, hooks.iter().map(|h| h.to_string()).collect()))
                .collect(),
            duration_buckets: DurationBuckets {
                short_max_seconds: 20.0,
                mid_max_seconds: 45.0,
            },
        }
    }
}

/// Normalize a declared hook type for lookup: trimmed, lowercase,
/// with spaces and underscores folded to hyphens.
pub fn normalize_hook_type(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '_' || c.is_whitespace() { '-' } else { c })
        .collect()
}

// ── Compiled (hot-path) types ───────────────────────────────────────

/// Pre-compiled signature config with a flat hook-type → category index.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSignatureConfig {
    pub hook_index: HashMap<String, HookCategory>,
    pub duration_buckets: DurationBuckets,
}

impl CompiledSignatureConfig {
    /// Look up a declared hook type, falling back to [`HookCategory::Other`].
    pub fn hook_category(&self, hook_type: &str) -> HookCategory {
        self.hook_index
            .get(&normalize_hook_type(hook_type))
            .copied()
            .unwrap_or(HookCategory::Other)
    }
}

impl Default for CompiledSignatureConfig {
    fn default() -> Self {
        SignatureConfigSpec::default().compile()
    }
}

impl SignatureConfigSpec {
    /// Flatten the per-category lists into a lookup index.
    ///
    /// Duplicate hook types across categories are reported by validation;
    /// here the last category in key order wins.
    pub fn compile(&self) -> CompiledSignatureConfig {
        let mut hook_index = HashMap::new();
        for (category, hooks) in &self.hook_categories {
            for hook in hooks {
                hook_index.insert(normalize_hook_type(hook), *category);
            }
        }
        CompiledSignatureConfig {
            hook_index,
            duration_buckets: self.duration_buckets.clone(),
        }
    }
}

impl SignatureConfigRule {
    /// Compile the YAML config.
    pub fn compile(&self) -> CompiledSignatureConfig {
        self.spec.compile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = include_str!("../../../data/rules/signature/signature-config.yml");

    #[test]
    fn parse_signature_config_yaml() {
        let rule: SignatureConfigRule = serde_yaml::from_str(YAML).unwrap();
        assert_eq!(rule.kind, "SignatureConfig");
        assert_eq!(rule.spec.duration_buckets.short_max_seconds, 20.0);
        assert!(rule.spec.hook_categories.contains_key(&HookCategory::Narrative));
    }

    #[test]
    fn shipped_yaml_matches_compiled_defaults() {
        let rule: SignatureConfigRule = serde_yaml::from_str(YAML).unwrap();
        assert_eq!(rule.spec, SignatureConfigSpec::default());
    }

    #[test]
    fn lookup_normalizes_and_falls_back() {
        let compiled = CompiledSignatureConfig::default();
        assert_eq!(compiled.hook_category("Problem Solution"), HookCategory::ProblemSolving);
        assert_eq!(compiled.hook_category(" QUESTION "), HookCategory::Engagement);
        assert_eq!(compiled.hook_category("before_after"), HookCategory::ProblemSolving);
        assert_eq!(compiled.hook_category("asmr"), HookCategory::Other);
        assert_eq!(compiled.hook_category(""), HookCategory::Other);
    }

    #[test]
    fn normalize_hook_type_folds_separators() {
        assert_eq!(normalize_hook_type("Day In_The Life"), "day-in-the-life");
    }
}
