use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use creative_compute::AssetFixture;
use creative_core::{AssetPopulation, Config};
use creative_rules::loader::{LoadResult, LoadStatus};
use creative_rules::{RuleLoader, RuleSet};

use crate::cli::CliArgs;

/// Environment config with command-line overrides applied.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub rules_dir: PathBuf,
    pub strict_rules: bool,
    pub builtin_rules: bool,
    pub fixtures: PathBuf,
}

impl CliConfig {
    pub fn resolve(config: &Config, args: &CliArgs) -> Self {
        Self {
            rules_dir: args.rules.clone().unwrap_or_else(|| config.rules.dir.clone()),
            strict_rules: config.rules.strict,
            builtin_rules: args.builtin_rules,
            fixtures: args.fixtures.clone().unwrap_or_else(|| config.data.fixtures.clone()),
        }
    }

    /// Scan the rules directory, honoring strict mode.
    pub fn load_rule_files(&self) -> Result<(RuleLoader, Vec<LoadResult>)> {
        let mut loader = RuleLoader::new(self.rules_dir.clone());
        let results = if self.strict_rules {
            loader.load_all_strict()
        } else {
            loader.load_all()
        }
        .with_context(|| format!("failed to load rules from {}", self.rules_dir.display()))?;

        for result in &results {
            if let LoadStatus::Failed { error } = &result.status {
                warn!(path = %result.path.display(), error = %error, "rule file rejected");
            }
        }
        Ok((loader, results))
    }

    /// Compiled rule set: the embedded rules when requested or when the
    /// directory yields no documents, otherwise the directory's documents.
    pub fn load_rules(&self) -> Result<RuleSet> {
        if self.builtin_rules {
            debug!("using embedded rules");
            return RuleSet::builtin().context("embedded rules failed to parse");
        }

        let (loader, _) = self.load_rule_files()?;
        if loader.is_empty() {
            info!(path = %self.rules_dir.display(), "no rule documents found; using embedded rules");
            return RuleSet::builtin().context("embedded rules failed to parse");
        }
        info!(documents = loader.len(), "rules loaded");
        Ok(RuleSet::from_loader(&loader))
    }

    pub fn load_population(&self) -> Result<AssetPopulation> {
        let json = fs::read_to_string(&self.fixtures)
            .with_context(|| format!("failed to read fixtures {}", self.fixtures.display()))?;
        let population = AssetFixture::from_json(&json)
            .and_then(AssetFixture::into_population)
            .with_context(|| format!("invalid fixtures {}", self.fixtures.display()))?;
        info!(assets = population.len(), "population loaded");
        Ok(population)
    }
}
