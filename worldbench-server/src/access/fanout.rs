//! Concurrent random world lookups over one lease

use std::sync::Arc;

use futures::stream::{FuturesUnordered, Stream, StreamExt};

use super::fetch::fetch_world;
use crate::db::{ConnectionHandle, DbError, DbResult};
use crate::models::{World, MAX_WORLD_ID};
use crate::random::RandomSource;

/// Look up `count` uniformly drawn worlds concurrently.
///
/// All lookups are spawned before this returns, each holding a clone of
/// `handle`. Results come out in completion order and the stream yields
/// exactly `count` items. Keys are drawn independently, so ids may
/// repeat.
///
/// Collecting with `try_collect` stops at the first failure. Lookups
/// still running at that point are detached, not aborted: they finish
/// on their own and their results are dropped.
pub fn fetch_many(
    handle: &ConnectionHandle,
    random: &dyn RandomSource,
    count: usize,
) -> impl Stream<Item = DbResult<World>> + Send + 'static {
    let pending: FuturesUnordered<_> = (0..count)
        .map(|_| {
            let key = random.next(MAX_WORLD_ID);
            let conn = Arc::clone(handle);
            tokio::spawn(async move { fetch_world(&*conn, key).await })
        })
        .collect();

    tracing::debug!(count, "world lookups submitted");

    pending.map(|joined| joined.map_err(DbError::from).and_then(|result| result))
}
