//! Wish record and derived per-owner statistics

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::error::{WishError, WishResult};

/// Wish record as stored.
///
/// `bought_at` is `Some` exactly when `is_bought` is true. An empty
/// `description` means the wish has none.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Wish {
    pub id: i64,
    pub owner_email: String,
    pub title: String,
    pub description: String,
    pub is_bought: bool,
    pub bought_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Wish {
    /// Flip the wish to bought. One-way: a second call fails and leaves
    /// `bought_at` as it was.
    pub fn mark_bought(&mut self, at: DateTime<Utc>) -> WishResult<()> {
        if self.is_bought {
            return Err(WishError::AlreadyBought);
        }
        self.is_bought = true;
        self.bought_at = Some(at);
        Ok(())
    }
}

/// Insert payload; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewWish {
    pub owner_email: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Counts for one owner, recomputed on every request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WishStats {
    pub total: i64,
    pub bought: i64,
    pub pending: i64,
}

impl WishStats {
    pub fn from_counts(total: i64, bought: i64) -> Self {
        Self {
            total,
            bought,
            pending: total - bought,
        }
    }
}

/// Current time at the precision PostgreSQL keeps (microseconds), so a
/// timestamp reads back equal to what was written.
pub fn store_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
