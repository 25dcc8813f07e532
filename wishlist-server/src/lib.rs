//! wishlist-server: HTTP service for per-owner wishlists
//!
//! Three layers, leaf first:
//! - `db`: repository trait with PostgreSQL and in-memory adapters
//! - `service`: validation and the bought state transition
//! - `http`: axum routes, extractors, and error responses

pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod service;

pub use error::{ErrorKind, WishError, WishResult};
pub use service::WishService;
