//! Database error type

/// Result alias for the database layer
pub type DbResult<T> = Result<T, DbError>;

/// Failures surfaced by the pool and its connections.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// The pool could not hand out a connection
    #[error("connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// A statement failed in transport or protocol
    #[error("query error: {0}")]
    Query(#[source] sqlx::Error),

    /// A point lookup matched no row
    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    /// A spawned lookup panicked or was aborted
    #[error("lookup task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl DbError {
    pub fn world_not_found(id: i32) -> Self {
        Self::NotFound {
            resource: "world",
            id: id.to_string(),
        }
    }
}
