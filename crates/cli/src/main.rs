mod cli;
mod commands;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use creative_core::config::load_dotenv;
use creative_core::Config;

use crate::cli::CliArgs;
use crate::config::CliConfig;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.json_logs);

    load_dotenv();
    let env_config = Config::from_env();
    env_config.log_summary();
    let config = CliConfig::resolve(&env_config, &args);

    let output = match commands::run(&args.command, &config) {
        Ok(output) => output,
        Err(e) => {
            error!(error = %format!("{e:#}"), "command failed");
            return Err(e);
        }
    };

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}
