//! Route handlers organized by resource

pub mod fortunes;
pub mod health;
pub mod world;
