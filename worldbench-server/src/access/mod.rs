//! Request-scoped data access over a single lease
//!
//! Everything here is a free function over an injected
//! [`ConnectionHandle`](crate::db::ConnectionHandle) and
//! [`RandomSource`](crate::random::RandomSource); nothing survives the
//! request except the pool itself.

pub mod fanout;
pub mod fetch;
pub mod fortunes;
pub mod updates;

pub use fanout::fetch_many;
pub use fetch::{fetch_random_world, fetch_world};
pub use fortunes::collect;
pub use updates::{update_many, WriteBackSnapshot, WriteBackStats};
