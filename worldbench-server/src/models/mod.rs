//! Domain records and request parameters

pub mod fortune;
pub mod query_count;
pub mod world;

pub use fortune::Fortune;
pub use query_count::QueryCount;
pub use world::{World, MAX_WORLD_ID};
