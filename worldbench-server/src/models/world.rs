//! World row projection

use serde::Serialize;
use sqlx::FromRow;

/// Highest world id, and the upper bound for `randomNumber`.
/// The `world` table holds ids `1..=MAX_WORLD_ID` with no gaps.
pub const MAX_WORLD_ID: i32 = 10_000;

/// One row of the `world` table.
///
/// `id` never changes after construction; `random_number` is rewritten
/// once per update request before the write-back is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, FromRow)]
pub struct World {
    id: i32,
    #[serde(rename = "randomNumber")]
    #[sqlx(rename = "randomnumber")]
    random_number: i32,
}

impl World {
    pub fn new(id: i32, random_number: i32) -> Self {
        Self { id, random_number }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn random_number(&self) -> i32 {
        self.random_number
    }

    pub fn set_random_number(&mut self, value: i32) {
        self.random_number = value;
    }
}
