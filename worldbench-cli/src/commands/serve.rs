//! HTTP server command
//!
//! Builds the pool (Postgres, or in-memory with `--memory`) and runs the
//! benchmark routes until Ctrl+C / SIGTERM.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use worldbench_server::db::{create_pool_with_options, ConnectionPool};
use worldbench_server::random::{RandomSource, SeededRandom, ThreadRandom};
use worldbench_server::{run_server, AppState, MemoryPool, MemoryStore, ServerConfig};

use super::config::{resolve, ConnectionOverrides};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ConnectionOverrides,

    /// Serve from a seeded in-memory store instead of Postgres
    #[arg(long)]
    pub memory: bool,

    /// Seed the random source for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Run the HTTP server
pub async fn run_serve(config_path: Option<&Path>, args: ServeArgs) -> Result<()> {
    let config = resolve(config_path, &args.overrides)?;

    let random: Arc<dyn RandomSource> = match args.seed {
        Some(seed) => Arc::new(SeededRandom::new(seed)),
        None => Arc::new(ThreadRandom),
    };

    let pool: Arc<dyn ConnectionPool> = if args.memory {
        tracing::info!("Using in-memory store");
        let store = MemoryStore::benchmark(random.as_ref());
        Arc::new(MemoryPool::new(
            Arc::new(store),
            config.database.max_connections as usize,
        ))
    } else {
        let options = config
            .database
            .connect_options()
            .context("Invalid database settings")?;
        let pool = create_pool_with_options(
            options,
            config.database.max_connections,
            config.database.acquire_timeout(),
        )
        .await
        .context("Failed to create database pool")?;
        Arc::new(pool)
    };

    tracing::info!("Starting worldbench server on {}", config.server.bind);

    let server_config = ServerConfig {
        bind_addr: config.server.bind,
    };

    // Run server (blocks until shutdown)
    run_server(AppState::with_random(pool, random), server_config)
        .await
        .context("Server error")?;

    Ok(())
}
