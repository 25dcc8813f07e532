//! Repository contract and its implementations
//!
//! The service depends only on `WishRepository`; any backend honouring
//! the contract below is substitutable.

pub mod memory;
pub mod wishes;

use async_trait::async_trait;

use crate::error::WishResult;
use crate::models::{NewWish, Wish, WishStats};

pub use memory::MemoryWishRepo;
pub use wishes::PgWishRepo;

/// Persistence capability consumed by the service.
///
/// Dropping a returned future cancels the operation.
#[async_trait]
pub trait WishRepository: Send + Sync {
    /// Insert a wish and return it with its store-assigned id.
    async fn create(&self, wish: NewWish) -> WishResult<Wish>;

    /// Fetch one wish. `NotFound` when no row matches.
    async fn get_by_id(&self, id: i64) -> WishResult<Wish>;

    /// All wishes of an owner, newest first, optionally filtered by
    /// purchase status. An unknown owner yields an empty list.
    async fn list(&self, owner_email: &str, bought: Option<bool>) -> WishResult<Vec<Wish>>;

    /// Persist title, description, is_bought and bought_at for an existing
    /// id. `NotFound` when no row was affected.
    async fn update(&self, wish: &Wish) -> WishResult<()>;

    /// `NotFound` when no row was affected.
    async fn delete(&self, id: i64) -> WishResult<()>;

    /// Counts for an owner; all zero for an unknown owner.
    async fn stats(&self, owner_email: &str) -> WishResult<WishStats>;
}
