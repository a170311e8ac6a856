//! Fortune row projection

use serde::Serialize;
use sqlx::FromRow;

/// Message of the fortune appended to every `/fortunes` response.
pub const EXTRA_FORTUNE_MESSAGE: &str = "Additional fortune added at request time.";

/// One row of the `fortune` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Fortune {
    pub id: i32,
    pub message: String,
}

impl Fortune {
    pub fn new(id: i32, message: impl Into<String>) -> Self {
        Self {
            id,
            message: message.into(),
        }
    }

    /// The synthetic fortune (id 0). Never persisted.
    pub fn request_time() -> Self {
        Self::new(0, EXTRA_FORTUNE_MESSAGE)
    }
}
