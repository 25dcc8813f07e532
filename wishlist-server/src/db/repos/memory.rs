//! In-memory wish repository
//!
//! Same contract as the PostgreSQL adapter: ascending store-assigned ids,
//! newest-first listing, `NotFound` on unknown ids. Can be switched into an
//! "unavailable" mode where every call fails like a dead database.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::WishRepository;
use crate::error::{WishError, WishResult};
use crate::models::{NewWish, Wish, WishStats};

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Wish>,
}

#[derive(Default)]
pub struct MemoryWishRepo {
    table: Mutex<Table>,
    unavailable: AtomicBool,
}

impl MemoryWishRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with an infrastructure error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored wishes.
    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_available(&self) -> WishResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(WishError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl WishRepository for MemoryWishRepo {
    async fn create(&self, wish: NewWish) -> WishResult<Wish> {
        self.check_available()?;
        let mut table = self.lock();
        table.next_id += 1;

        let created = Wish {
            id: table.next_id,
            owner_email: wish.owner_email,
            title: wish.title,
            description: wish.description,
            is_bought: false,
            bought_at: None,
            created_at: wish.created_at,
        };
        table.rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> WishResult<Wish> {
        self.check_available()?;
        self.lock()
            .rows
            .get(&id)
            .cloned()
            .ok_or(WishError::NotFound { id })
    }

    async fn list(&self, owner_email: &str, bought: Option<bool>) -> WishResult<Vec<Wish>> {
        self.check_available()?;
        let mut wishes: Vec<Wish> = self
            .lock()
            .rows
            .values()
            .filter(|w| w.owner_email == owner_email)
            .filter(|w| bought.map_or(true, |b| w.is_bought == b))
            .cloned()
            .collect();

        wishes.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(wishes)
    }

    async fn update(&self, wish: &Wish) -> WishResult<()> {
        self.check_available()?;
        let mut table = self.lock();
        let row = table
            .rows
            .get_mut(&wish.id)
            .ok_or(WishError::NotFound { id: wish.id })?;

        row.title.clone_from(&wish.title);
        row.description.clone_from(&wish.description);
        row.is_bought = wish.is_bought;
        row.bought_at = wish.bought_at;
        Ok(())
    }

    async fn delete(&self, id: i64) -> WishResult<()> {
        self.check_available()?;
        self.lock()
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(WishError::NotFound { id })
    }

    async fn stats(&self, owner_email: &str) -> WishResult<WishStats> {
        self.check_available()?;
        let table = self.lock();
        let owned = table.rows.values().filter(|w| w.owner_email == owner_email);

        let (total, bought) = owned.fold((0, 0), |(total, bought), w| {
            (total + 1, bought + i64::from(w.is_bought))
        });
        Ok(WishStats::from_counts(total, bought))
    }
}
