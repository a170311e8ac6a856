//! Database layer - connection pool and per-lease statements
//!
//! # Design Principles
//!
//! - One lease per request; every sub-operation of that request shares it
//! - Leases release themselves on drop, so every exit path returns them
//! - No retries and no caching at this layer

pub mod error;
pub mod memory;
pub mod pool;
pub mod postgres;

pub use error::{DbError, DbResult};
pub use memory::{MemoryPool, MemoryStore};
pub use pool::{Connection, ConnectionHandle, ConnectionPool};
pub use postgres::{create_pool, create_pool_with_options, PgConnectionPool};
