//! worldbench-server: database micro-benchmark HTTP service
//!
//! Four request shapes against a pooled relational store:
//! - `/db`: one random world
//! - `/queries`: N concurrent random worlds over one lease
//! - `/updates`: the same, with fire-and-forget write-back
//! - `/fortunes`: full scan plus one synthetic row, sorted, rendered

pub mod access;
pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod random;
pub mod render;

pub use config::{BenchConfig, ConfigError, DatabaseConfig};
pub use db::{ConnectionPool, DbError, DbResult, MemoryPool, MemoryStore, PgConnectionPool};
pub use http::{build_router, run_server, AppState, ServerConfig};
