//! Connection pool and lease abstractions
//!
//! A [`ConnectionHandle`] is a shared lease on one pooled connection.
//! Clones of the handle are how concurrent sub-operations of a single
//! request share that connection; the lease goes back to the pool when
//! the last clone drops.

use std::sync::Arc;

use async_trait::async_trait;

use super::error::DbResult;
use crate::models::{Fortune, World};

/// Statements available on a leased connection.
///
/// Implementations must accept concurrent calls through a shared
/// reference. A transport that cannot pipeline is free to queue them.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Point lookup on `world` by primary key.
    async fn find_world(&self, id: i32) -> DbResult<Option<World>>;

    /// Overwrite `randomnumber` for one world.
    async fn update_world(&self, id: i32, random_number: i32) -> DbResult<()>;

    /// Every row of `fortune`, in storage order.
    async fn fortunes(&self) -> DbResult<Vec<Fortune>>;
}

/// Shared lease on a pooled connection.
pub type ConnectionHandle = Arc<dyn Connection>;

/// Bounded set of live connections.
#[async_trait]
pub trait ConnectionPool: Send + Sync {
    /// Wait for a free connection.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Connection` when the store is unreachable, the
    /// wait times out, or the pool has been closed. Never retries.
    async fn acquire(&self) -> DbResult<ConnectionHandle>;

    /// Stop handing out connections and close the idle ones.
    /// Leases still held are closed as they come back.
    async fn close(&self);
}
