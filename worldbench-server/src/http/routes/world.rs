//! World endpoints: `/db`, `/queries`, `/updates`
//!
//! Each request leases one connection and shares it across all of its
//! lookups. The lease is returned when the last clone drops, which for
//! `/updates` is after the background write-backs finish.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::{routing::get, Json, Router};
use futures::TryStreamExt;

use crate::access::{fetch_many, fetch_random_world, update_many};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::{QueryCount, World};

/// GET /db - one random world
async fn single_query(State(state): State<Arc<AppState>>) -> Result<Json<World>, ApiError> {
    let conn = state.pool.acquire().await?;
    let world = fetch_random_world(&*conn, &*state.random).await?;
    Ok(Json(world))
}

/// Query string as raw pairs, so a repeated or malformed `queries`
/// falls back to the count rule instead of a 400 from the extractor.
type QueryPairs = Query<Vec<(String, String)>>;

/// GET /queries?queries=N - N random worlds
async fn multiple_queries(
    State(state): State<Arc<AppState>>,
    Query(pairs): QueryPairs,
) -> Result<Json<Vec<World>>, ApiError> {
    let count = QueryCount::from_pairs(&pairs).get();
    let conn = state.pool.acquire().await?;
    let worlds: Vec<World> = fetch_many(&conn, &*state.random, count)
        .try_collect()
        .await?;
    Ok(Json(worlds))
}

/// GET /updates?queries=N - N random worlds with new random numbers
async fn updates(
    State(state): State<Arc<AppState>>,
    Query(pairs): QueryPairs,
) -> Result<Json<Vec<World>>, ApiError> {
    let count = QueryCount::from_pairs(&pairs).get();
    let conn = state.pool.acquire().await?;
    let worlds: Vec<World> = update_many(&conn, &state.random, &state.write_backs, count)
        .try_collect()
        .await?;
    Ok(Json(worlds))
}

/// World routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/db", get(single_query))
        .route("/queries", get(multiple_queries))
        .route("/updates", get(updates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryPool, MemoryStore};
    use crate::random::SeededRandom;

    fn state(store: MemoryStore) -> (Arc<AppState>, MemoryPool) {
        let pool = MemoryPool::new(Arc::new(store), 2);
        let state = AppState::with_random(Arc::new(pool.clone()), Arc::new(SeededRandom::new(1)));
        (Arc::new(state), pool)
    }

    fn params(raw: &str) -> QueryPairs {
        Query(vec![("queries".to_string(), raw.to_string())])
    }

    #[tokio::test]
    async fn db_returns_one_world() {
        let (state, _) = state(MemoryStore::with_uniform_worlds(1));
        let Json(world) = single_query(State(state)).await.unwrap();
        assert_eq!(world.random_number(), 1);
    }

    #[tokio::test]
    async fn queries_honours_count() {
        let (state, _) = state(MemoryStore::with_uniform_worlds(1));
        let Json(worlds) = multiple_queries(State(state), params("3")).await.unwrap();
        assert_eq!(worlds.len(), 3);
    }

    #[tokio::test]
    async fn updates_count_write_backs() {
        let (state, _) = state(MemoryStore::with_uniform_worlds(1));
        let Json(worlds) = updates(State(Arc::clone(&state)), params("4"))
            .await
            .unwrap();
        assert_eq!(worlds.len(), 4);
        assert_eq!(state.write_backs.snapshot().submitted, 4);
    }

    #[tokio::test]
    async fn every_exit_path_returns_the_lease() {
        let (state, pool) = state(MemoryStore::new());

        assert!(single_query(State(Arc::clone(&state))).await.is_err());
        assert!(multiple_queries(State(Arc::clone(&state)), params("20"))
            .await
            .is_err());

        // Detached sibling lookups hold the lease until they finish.
        for _ in 0..100 {
            if pool.idle() == 2 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(pool.idle(), 2);
    }
}
