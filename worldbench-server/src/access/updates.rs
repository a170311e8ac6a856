//! Random world lookups with fire-and-forget write-back
//!
//! Each fetched world gets a fresh `randomNumber` and an `UPDATE` is
//! spawned on the same lease. The record is emitted right away; the
//! write is never awaited and its outcome never reaches the response.
//! Outcomes are counted in [`WriteBackStats`] and failures are logged.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::stream::{Stream, TryStreamExt};
use serde::Serialize;

use super::fanout::fetch_many;
use crate::db::{ConnectionHandle, DbResult};
use crate::models::{World, MAX_WORLD_ID};
use crate::random::RandomSource;

/// Process-wide write-back counters.
#[derive(Debug, Default)]
pub struct WriteBackStats {
    submitted: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

/// Point-in-time copy of [`WriteBackStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WriteBackSnapshot {
    pub submitted: u64,
    pub completed: u64,
    pub failed: u64,
}

impl WriteBackStats {
    pub fn snapshot(&self) -> WriteBackSnapshot {
        // Outcomes before submissions: an outcome seen here implies its
        // submission is visible too, so finished never exceeds submitted.
        let failed = self.failed.load(Ordering::Acquire);
        let completed = self.completed.load(Ordering::Acquire);
        let submitted = self.submitted.load(Ordering::Relaxed);
        WriteBackSnapshot {
            submitted,
            completed,
            failed,
        }
    }
}

impl WriteBackSnapshot {
    /// Write-backs not yet finished either way.
    pub fn in_flight(&self) -> u64 {
        self.submitted
            .saturating_sub(self.completed)
            .saturating_sub(self.failed)
    }
}

/// Fetch `count` random worlds, give each a new random number and
/// write it back without waiting.
///
/// Yields exactly `count` records carrying the new values. Read
/// failures propagate like [`fetch_many`]; write failures do not.
pub fn update_many(
    handle: &ConnectionHandle,
    random: &Arc<dyn RandomSource>,
    stats: &Arc<WriteBackStats>,
    count: usize,
) -> impl Stream<Item = DbResult<World>> + Send + 'static {
    let handle = Arc::clone(handle);
    let random = Arc::clone(random);
    let stats = Arc::clone(stats);

    fetch_many(&handle, &*random, count).map_ok(move |mut world| {
        world.set_random_number(random.next(MAX_WORLD_ID));
        spawn_write_back(&handle, &stats, world);
        world
    })
}

fn spawn_write_back(handle: &ConnectionHandle, stats: &Arc<WriteBackStats>, world: World) {
    let conn = Arc::clone(handle);
    let stats = Arc::clone(stats);
    stats.submitted.fetch_add(1, Ordering::Relaxed);

    tokio::spawn(async move {
        match conn.update_world(world.id(), world.random_number()).await {
            Ok(()) => {
                stats.completed.fetch_add(1, Ordering::Release);
            }
            Err(e) => {
                stats.failed.fetch_add(1, Ordering::Release);
                tracing::warn!(id = world.id(), error = %e, "world write-back failed");
            }
        }
    });
}
