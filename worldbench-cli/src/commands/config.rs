use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use worldbench_server::BenchConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML (passwords masked)
    Show(ConnectionOverrides),
    /// Print a default configuration file
    Default,
}

/// Settings that can come from flags or environment and beat the file
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionOverrides {
    /// Address to bind to
    #[arg(long, short = 'b', env = "WORLDBENCH_BIND")]
    pub bind: Option<SocketAddr>,

    /// Postgres connection URI (overrides host/port/user fields)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum pooled connections (at least 1)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_connections: Option<u32>,
}

/// File (or defaults) with flag/env overrides applied on top.
pub fn resolve(path: Option<&Path>, overrides: &ConnectionOverrides) -> Result<BenchConfig> {
    let mut config = match path {
        Some(path) => BenchConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => BenchConfig::default(),
    };

    if let Some(bind) = overrides.bind {
        config.server.bind = bind;
    }
    if let Some(url) = &overrides.database_url {
        config.database.uri = Some(url.clone());
    }
    if let Some(max) = overrides.max_connections {
        config.database.max_connections = max;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

pub fn run_config(path: Option<&Path>, args: ConfigArgs) -> Result<()> {
    let config = match args.command {
        ConfigCommands::Show(overrides) => resolve(path, &overrides)?,
        ConfigCommands::Default => BenchConfig::default(),
    };
    print!("{}", config.to_redacted_toml()?);
    Ok(())
}
