//! Single-row world lookup

use crate::db::{Connection, DbError, DbResult};
use crate::models::{World, MAX_WORLD_ID};
use crate::random::RandomSource;

/// Look up the world with id `key`.
///
/// The key space is dense, so a miss is reported as
/// `DbError::NotFound` rather than `Ok(None)`.
pub async fn fetch_world(conn: &dyn Connection, key: i32) -> DbResult<World> {
    conn.find_world(key)
        .await?
        .ok_or_else(|| DbError::world_not_found(key))
}

/// Look up a world with a uniformly drawn id.
pub async fn fetch_random_world(
    conn: &dyn Connection,
    random: &dyn RandomSource,
) -> DbResult<World> {
    fetch_world(conn, random.next(MAX_WORLD_ID)).await
}
