//! Core [`RuleLoader`] struct: filesystem-backed, load-once rule loading.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::schema::{RuleDocument, RuleEnvelope};
use crate::validation::validate_document;

use super::error::{LoadResult, LoadStatus, Result, RuleError};

/// Filesystem-backed rule loader.
///
/// Scans a directory (recursively) for `*.yml` / `*.yaml` files, deserializes
/// them into [`RuleDocument`] instances via two-pass deserialization, and
/// keeps them in a map keyed by rule ID (sorted, so iteration is deterministic).
pub struct RuleLoader {
    /// Root directory containing rule YAML files.
    rules_dir: PathBuf,
    /// All loaded rule documents keyed by `metadata.id`.
    documents: BTreeMap<String, RuleDocument>,
}

impl RuleLoader {
    /// Create a new loader for the given directory. Nothing is read until
    /// [`load_all`](Self::load_all) is called.
    pub fn new(rules_dir: PathBuf) -> Self {
        Self {
            rules_dir,
            documents: BTreeMap::new(),
        }
    }

    /// Recursively scan the rules directory and load all YAML files.
    ///
    /// Dotfiles (filenames starting with `.`) and non-YAML files are skipped.
    /// Parse and validation errors are reported per-file but do not abort the scan.
    /// A missing directory yields no results (built-in defaults apply).
    pub fn load_all(&mut self) -> Result<Vec<LoadResult>> {
        let mut results = Vec::new();
        if !self.rules_dir.exists() {
            warn!(path = %self.rules_dir.display(), "rules directory does not exist; using built-in rules");
            return Ok(results);
        }
        let dir = self.rules_dir.clone();
        self.scan_dir_recursive(&dir, &mut results)?;
        Ok(results)
    }

    /// Like [`load_all`](Self::load_all) but fails if any file failed to load.
    pub fn load_all_strict(&mut self) -> Result<Vec<LoadResult>> {
        let results = self.load_all()?;
        let failed = results.iter().filter(|r| r.is_failed()).count();
        if failed > 0 {
            return Err(RuleError::LoadFailed {
                dir: self.rules_dir.clone(),
                failed,
            });
        }
        Ok(results)
    }

    /// Recursively scan a directory for YAML rule files.
    fn scan_dir_recursive(&mut self, dir: &Path, results: &mut Vec<LoadResult>) -> Result<()> {
        let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::result::Result<_, _>>()?;
        entries.sort();

        for path in entries {
            // Skip dotfiles/dotdirs
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    if path.is_file() {
                        results.push(LoadResult {
                            path,
                            status: LoadStatus::Skipped {
                                reason: "dotfile".to_string(),
                            },
                        });
                    }
                    continue;
                }
            }

            // Recurse into subdirectories
            if path.is_dir() {
                self.scan_dir_recursive(&path, results)?;
                continue;
            }

            // Skip non-YAML extensions
            let is_yaml = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e == "yml" || e == "yaml")
                .unwrap_or(false);

            if !is_yaml {
                results.push(LoadResult {
                    path,
                    status: LoadStatus::Skipped {
                        reason: "not a YAML file".to_string(),
                    },
                });
                continue;
            }

            match self.load_file(&path) {
                Ok(doc) => {
                    let rule_id = doc.metadata().id.clone();
                    info!(rule_id = %rule_id, kind = %doc.kind(), path = %path.display(), "loaded rule");
                    if self.documents.insert(rule_id.clone(), doc).is_some() {
                        warn!(rule_id = %rule_id, path = %path.display(), "duplicate rule id; later file wins");
                    }
                    results.push(LoadResult {
                        path,
                        status: LoadStatus::Loaded { rule_id },
                    });
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load rule file");
                    results.push(LoadResult {
                        path,
                        status: LoadStatus::Failed {
                            error: e.to_string(),
                        },
                    });
                }
            }
        }

        Ok(())
    }

    /// Parse and validate a single YAML file into a [`RuleDocument`].
    pub fn load_file(&self, path: &Path) -> Result<RuleDocument> {
        let contents = fs::read_to_string(path)?;
        parse_document(&contents)
    }

    /// Get the rules directory path.
    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }

    /// All loaded documents in rule-id order.
    pub fn documents(&self) -> impl Iterator<Item = &RuleDocument> {
        self.documents.values()
    }

    pub fn get(&self, id: &str) -> Option<&RuleDocument> {
        self.documents.get(id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Parse YAML text via two-pass deserialization and validate the result.
///
/// First pass: deserialize as [`RuleEnvelope`] to read the `kind` field.
/// Second pass: reconstruct and deserialize into the kind-specific type.
pub(crate) fn parse_document(contents: &str) -> Result<RuleDocument> {
    let envelope: RuleEnvelope = serde_yaml::from_str(contents)?;

    if envelope.metadata.id.is_empty() {
        return Err(RuleError::Validation(
            "rule metadata.id must not be empty".to_string(),
        ));
    }

    let doc = envelope.parse_full().map_err(|e| {
        RuleError::Validation(format!("failed to parse rule '{}': {}", envelope.metadata.id, e))
    })?;

    let validation = validate_document(&doc);
    if !validation.valid {
        return Err(RuleError::Validation(format!(
            "rule '{}' is invalid: {}",
            envelope.metadata.id,
            validation.error_summary()
        )));
    }
    for w in &validation.warnings {
        warn!(rule_id = %envelope.metadata.id, path = %w.path, "{}", w.message);
    }

    Ok(doc)
}
