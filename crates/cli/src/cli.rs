use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Creative performance intelligence from the command line.
///
/// Loads rule documents and an asset fixture, then prints fatigue
/// assessments, clusters, strategies or playbooks as JSON.
#[derive(Parser, Debug)]
#[command(name = "creative-intel", about = "Creative fatigue, clustering and strategy analysis")]
pub struct CliArgs {
    /// Rules directory (overrides CREATIVE_RULES_DIR)
    #[arg(long, global = true)]
    pub rules: Option<PathBuf>,

    /// Ignore the rules directory and use the embedded rule set
    #[arg(long, global = true)]
    pub builtin_rules: bool,

    /// Asset fixture JSON (overrides CREATIVE_FIXTURES)
    #[arg(long, global = true)]
    pub fixtures: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fatigue assessment for one asset, or for every asset
    Assess {
        /// Asset id
        #[arg(long)]
        asset: Option<String>,
    },
    /// Group the population into signature clusters
    Cluster,
    /// Aggregate statistics and insights per cluster
    Analyze {
        /// Restrict to one cluster id
        #[arg(long)]
        cluster: Option<String>,
    },
    /// Per-platform strategy recommendations per cluster
    Strategy {
        /// Restrict to one cluster id
        #[arg(long)]
        cluster: Option<String>,
    },
    /// Match playbooks by cluster context or scenario text; lists all otherwise
    Playbooks {
        /// Free-text scenario, matched case-insensitively
        #[arg(long, conflicts_with = "cluster")]
        scenario: Option<String>,
        /// Cluster id whose strategy context is matched
        #[arg(long)]
        cluster: Option<String>,
    },
    /// Full report: assessments, clusters, analyses, strategies and playbooks
    Report,
    /// Load and validate the rules directory
    Rules,
}
