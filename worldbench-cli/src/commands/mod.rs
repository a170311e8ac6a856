//! Command implementations for the worldbench CLI

pub mod config;
pub mod serve;

pub use config::run_config;
pub use serve::run_serve;
