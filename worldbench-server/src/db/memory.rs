//! In-process store implementing the pool traits
//!
//! Backs `worldbench serve --memory` and every test that needs a store
//! without Postgres. Capacity is enforced with a semaphore so lease
//! exhaustion and release behave like the real pool. Faults can be
//! switched on at runtime to exercise each error path.

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use super::error::{DbError, DbResult};
use super::pool::{Connection, ConnectionHandle, ConnectionPool};
use crate::models::{Fortune, World, MAX_WORLD_ID};
use crate::random::RandomSource;

/// The fortune table shipped with the benchmark database.
const BENCHMARK_FORTUNES: &[(i32, &str)] = &[
    (1, "fortune: No such file or directory"),
    (2, "A computer scientist is someone who fixes things that aren't broken."),
    (3, "After enough decimal places, nobody gives a damn."),
    (4, "A bad random number generator: 1, 1, 1, 1, 1, 4.33e+67, 1, 1, 1"),
    (5, "A computer program does what you tell it to do, not what you want it to do."),
    (6, "Emacs is a nice operating system, but I prefer UNIX. \u{2014} Tom Christaensen"),
    (7, "Any program that runs right is obsolete."),
    (8, "A list is only as strong as its weakest link. \u{2014} Donald Knuth"),
    (9, "Feature: A bug with seniority."),
    (10, "Computers make very fast, very accurate mistakes."),
    (
        11,
        "<script>alert(\"This should not be displayed in a browser alert box.\");</script>",
    ),
    (12, "\u{30d5}\u{30ec}\u{30fc}\u{30e0}\u{30ef}\u{30fc}\u{30af}\u{306e}\u{30d9}\u{30f3}\u{30c1}\u{30de}\u{30fc}\u{30af}"),
];

/// Worlds and fortunes held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    worlds: RwLock<HashMap<i32, i32>>,
    fortunes: RwLock<Vec<Fortune>>,
    unreachable: AtomicBool,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    write_latency_ms: AtomicU64,
    writes_applied: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids `1..=10000`, all with the same `random_number`.
    pub fn with_uniform_worlds(random_number: i32) -> Self {
        let store = Self::new();
        for id in 1..=MAX_WORLD_ID {
            store.insert_world(World::new(id, random_number));
        }
        store
    }

    /// Full benchmark dataset: 10000 random worlds plus the stock fortunes.
    pub fn benchmark(random: &dyn RandomSource) -> Self {
        let store = Self::new();
        for id in 1..=MAX_WORLD_ID {
            store.insert_world(World::new(id, random.next(MAX_WORLD_ID)));
        }
        for (id, message) in BENCHMARK_FORTUNES {
            store.insert_fortune(Fortune::new(*id, *message));
        }
        store
    }

    pub fn insert_world(&self, world: World) {
        write(&self.worlds).insert(world.id(), world.random_number());
    }

    pub fn insert_fortune(&self, fortune: Fortune) {
        write(&self.fortunes).push(fortune);
    }

    pub fn world(&self, id: i32) -> Option<World> {
        read(&self.worlds)
            .get(&id)
            .map(|random_number| World::new(id, *random_number))
    }

    /// Number of write-backs that reached the store.
    pub fn writes_applied(&self) -> u64 {
        self.writes_applied.load(Ordering::SeqCst)
    }

    /// Refuse new leases as if the server were down.
    pub fn set_unreachable(&self, on: bool) {
        self.unreachable.store(on, Ordering::SeqCst);
    }

    /// Fail every read statement.
    pub fn set_fail_reads(&self, on: bool) {
        self.fail_reads.store(on, Ordering::SeqCst);
    }

    /// Fail every write statement.
    pub fn set_fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    /// Delay applied before each write lands.
    pub fn set_write_latency(&self, latency: Duration) {
        self.write_latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    fn check_reads(&self) -> DbResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DbError::Query(sqlx::Error::Protocol(
                "injected read failure".into(),
            )));
        }
        Ok(())
    }
}

/// [`ConnectionPool`] over a shared [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryPool {
    store: Arc<MemoryStore>,
    permits: Arc<Semaphore>,
}

impl MemoryPool {
    pub fn new(store: Arc<MemoryStore>, max_connections: usize) -> Self {
        Self {
            store,
            permits: Arc::new(Semaphore::new(max_connections)),
        }
    }

    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }

    /// Leases that could be handed out right now.
    pub fn idle(&self) -> usize {
        self.permits.available_permits()
    }
}

#[async_trait]
impl ConnectionPool for MemoryPool {
    async fn acquire(&self) -> DbResult<ConnectionHandle> {
        if self.store.unreachable.load(Ordering::SeqCst) {
            return Err(DbError::Connection(sqlx::Error::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "memory store unreachable",
            ))));
        }

        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| DbError::Connection(sqlx::Error::PoolClosed))?;

        Ok(Arc::new(MemoryLease {
            store: Arc::clone(&self.store),
            _permit: permit,
        }))
    }

    async fn close(&self) {
        self.permits.close();
    }
}

/// A lease holds one permit until the last handle clone drops.
struct MemoryLease {
    store: Arc<MemoryStore>,
    _permit: OwnedSemaphorePermit,
}

#[async_trait]
impl Connection for MemoryLease {
    async fn find_world(&self, id: i32) -> DbResult<Option<World>> {
        tokio::task::yield_now().await;
        self.store.check_reads()?;
        Ok(self.store.world(id))
    }

    async fn update_world(&self, id: i32, random_number: i32) -> DbResult<()> {
        let latency = self.store.write_latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.store.fail_writes.load(Ordering::SeqCst) {
            return Err(DbError::Query(sqlx::Error::Protocol(
                "injected write failure".into(),
            )));
        }

        // UPDATE on a missing id touches zero rows and is not an error.
        if let Some(current) = write(&self.store.worlds).get_mut(&id) {
            *current = random_number;
        }
        self.store.writes_applied.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn fortunes(&self) -> DbResult<Vec<Fortune>> {
        tokio::task::yield_now().await;
        self.store.check_reads()?;
        Ok(read(&self.store.fortunes).clone())
    }
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;

    #[test]
    fn benchmark_dataset_shape() {
        let store = MemoryStore::benchmark(&SeededRandom::new(1));
        assert!(store.world(1).is_some());
        assert!(store.world(MAX_WORLD_ID).is_some());
        assert!(store.world(0).is_none());
        assert!(store.world(MAX_WORLD_ID + 1).is_none());
        assert_eq!(read(&store.fortunes).len(), 12);
    }

    #[tokio::test]
    async fn lease_returns_permit_on_drop() {
        let pool = MemoryPool::new(Arc::new(MemoryStore::new()), 2);
        assert_eq!(pool.idle(), 2);

        let a = pool.acquire().await.unwrap();
        let b = a.clone();
        assert_eq!(pool.idle(), 1);

        drop(a);
        assert_eq!(pool.idle(), 1, "clone still holds the lease");
        drop(b);
        assert_eq!(pool.idle(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn acquire_waits_for_capacity() {
        let pool = MemoryPool::new(Arc::new(MemoryStore::new()), 1);
        let held = pool.acquire().await.unwrap();

        let waiter = {
            let pool = pool.clone();
            tokio::spawn(async move { pool.acquire().await.is_ok() })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        drop(held);
        assert!(waiter.await.unwrap());
    }

    #[tokio::test]
    async fn unreachable_store_fails_acquire() {
        let store = Arc::new(MemoryStore::new());
        store.set_unreachable(true);
        let pool = MemoryPool::new(store, 1);

        let err = pool.acquire().await.err().unwrap();
        assert!(matches!(err, DbError::Connection(_)));
        assert_eq!(pool.idle(), 1);
    }

    #[tokio::test]
    async fn closed_pool_fails_acquire() {
        let pool = MemoryPool::new(Arc::new(MemoryStore::new()), 1);
        pool.close().await;

        let err = pool.acquire().await.err().unwrap();
        assert!(matches!(err, DbError::Connection(sqlx::Error::PoolClosed)));
    }

    #[tokio::test]
    async fn update_touches_existing_rows_only() {
        let store = Arc::new(MemoryStore::with_uniform_worlds(1));
        let pool = MemoryPool::new(Arc::clone(&store), 1);
        let conn = pool.acquire().await.unwrap();

        conn.update_world(9, 77).await.unwrap();
        conn.update_world(MAX_WORLD_ID + 5, 77).await.unwrap();

        assert_eq!(store.world(9), Some(World::new(9, 77)));
        assert!(store.world(MAX_WORLD_ID + 5).is_none());
        assert_eq!(store.writes_applied(), 2);
    }

    #[tokio::test]
    async fn injected_faults_surface_as_query_errors() {
        let store = Arc::new(MemoryStore::with_uniform_worlds(1));
        let pool = MemoryPool::new(Arc::clone(&store), 1);
        let conn = pool.acquire().await.unwrap();

        store.set_fail_reads(true);
        assert!(matches!(conn.find_world(1).await, Err(DbError::Query(_))));
        assert!(matches!(conn.fortunes().await, Err(DbError::Query(_))));

        store.set_fail_writes(true);
        assert!(matches!(
            conn.update_world(1, 2).await,
            Err(DbError::Query(_))
        ));
        assert_eq!(store.writes_applied(), 0);
    }
}
