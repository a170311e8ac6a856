//! worldbench CLI - database micro-benchmark server
//!
//! Subcommands:
//! - `serve`: run the `/db`, `/queries`, `/updates` and `/fortunes` endpoints
//! - `config`: inspect the effective configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use commands::config::ConfigArgs;
use commands::serve::ServeArgs;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "worldbench",
    author,
    version,
    about = "Database micro-benchmark server: random lookups, write-backs and fortunes"
)]
struct Cli {
    /// TOML configuration file
    #[arg(long, short = 'c', global = true, env = "WORLDBENCH_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging (RUST_LOG still wins)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (requires the telemetry feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the benchmark HTTP server
    Serve(ServeArgs),
    /// Show configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })?;

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(cli.config.as_deref(), args).await,
        Commands::Config(args) => commands::run_config(cli.config.as_deref(), args),
    };

    tracing_setup::shutdown();
    result
}
