//! Database layer - connection pool, schema bootstrap, and repositories
//!
//! # Design Principles
//!
//! - Connection pool with a small fixed ceiling
//! - "Not found" comes from zero rows scanned or affected, never from a
//!   separate existence query
//! - One statement per repository call, no transactions

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_pool, create_pool_with_options};
pub use repos::*;
