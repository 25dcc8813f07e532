//! Wish service - business rules between HTTP and storage
//!
//! All input validation happens here, before any repository call. Update
//! and buy are fetch-then-write without locking: two concurrent buys of
//! the same wish can both pass the already-bought check, and the last
//! write wins.

use std::sync::Arc;

use crate::db::WishRepository;
use crate::error::WishResult;
use crate::models::{store_now, NewWish, OwnerEmail, Wish, WishStats, WishTitle};

#[derive(Clone)]
pub struct WishService {
    repo: Arc<dyn WishRepository>,
}

impl WishService {
    pub fn new(repo: Arc<dyn WishRepository>) -> Self {
        Self { repo }
    }

    /// Create a wish stamped with the current time.
    pub async fn create_wish(
        &self,
        owner_email: &str,
        title: &str,
        description: &str,
    ) -> WishResult<Wish> {
        let owner = OwnerEmail::new(owner_email)?;
        let title = WishTitle::new(title)?;

        let wish = self
            .repo
            .create(NewWish {
                owner_email: owner.into_string(),
                title: title.into_string(),
                description: description.to_owned(),
                created_at: store_now(),
            })
            .await?;

        tracing::info!(id = wish.id, owner = %wish.owner_email, "wish created");
        Ok(wish)
    }

    pub async fn get_wish(&self, id: i64) -> WishResult<Wish> {
        self.repo.get_by_id(id).await
    }

    pub async fn list_wishes(
        &self,
        owner_email: &str,
        bought: Option<bool>,
    ) -> WishResult<Vec<Wish>> {
        let owner = OwnerEmail::new(owner_email)?;
        let wishes = self.repo.list(owner.as_str(), bought).await?;
        tracing::debug!(owner = %owner.as_str(), ?bought, count = wishes.len(), "listed wishes");
        Ok(wishes)
    }

    /// Replace title and description. Purchase state is left alone.
    pub async fn update_wish(&self, id: i64, title: &str, description: &str) -> WishResult<Wish> {
        let title = WishTitle::new(title)?;

        let mut wish = self.repo.get_by_id(id).await?;
        wish.title = title.into_string();
        wish.description = description.to_owned();
        self.repo.update(&wish).await?;

        tracing::debug!(id, "wish updated");
        Ok(wish)
    }

    pub async fn delete_wish(&self, id: i64) -> WishResult<()> {
        self.repo.delete(id).await?;
        tracing::info!(id, "wish deleted");
        Ok(())
    }

    /// Mark a wish as bought. Fails with `AlreadyBought` on the second call.
    pub async fn buy_wish(&self, id: i64) -> WishResult<()> {
        let mut wish = self.repo.get_by_id(id).await?;
        wish.mark_bought(store_now())?;
        self.repo.update(&wish).await?;

        tracing::info!(id, "wish bought");
        Ok(())
    }

    pub async fn get_stats(&self, owner_email: &str) -> WishResult<WishStats> {
        let owner = OwnerEmail::new(owner_email)?;
        self.repo.stats(owner.as_str()).await
    }
}
