//! PostgreSQL wish repository
//!
//! Every call is a single parameterised statement:
//! - create: INSERT ... RETURNING the full row
//! - update/delete: rows_affected() == 0 means the id does not exist
//! - list: one static query, the bought filter is a nullable parameter

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::WishRepository;
use crate::error::{WishError, WishResult};
use crate::models::{NewWish, Wish, WishStats};

/// Wish repository over a shared connection pool
#[derive(Clone)]
pub struct PgWishRepo {
    pool: PgPool,
}

impl PgWishRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WishRepository for PgWishRepo {
    async fn create(&self, wish: NewWish) -> WishResult<Wish> {
        let created: Wish = sqlx::query_as(
            r#"
            INSERT INTO wishes (owner_email, title, description, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, owner_email, title, description, is_bought, bought_at, created_at
            "#,
        )
        .bind(&wish.owner_email)
        .bind(&wish.title)
        .bind(&wish.description)
        .bind(wish.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> WishResult<Wish> {
        sqlx::query_as(
            r#"
            SELECT id, owner_email, title, description, is_bought, bought_at, created_at
            FROM wishes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(WishError::NotFound { id })
    }

    async fn list(&self, owner_email: &str, bought: Option<bool>) -> WishResult<Vec<Wish>> {
        let wishes = sqlx::query_as(
            r#"
            SELECT id, owner_email, title, description, is_bought, bought_at, created_at
            FROM wishes
            WHERE owner_email = $1
              AND ($2::BOOLEAN IS NULL OR is_bought = $2)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_email)
        .bind(bought)
        .fetch_all(&self.pool)
        .await?;

        Ok(wishes)
    }

    async fn update(&self, wish: &Wish) -> WishResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE wishes
            SET title = $1, description = $2, is_bought = $3, bought_at = $4
            WHERE id = $5
            "#,
        )
        .bind(&wish.title)
        .bind(&wish.description)
        .bind(wish.is_bought)
        .bind(wish.bought_at)
        .bind(wish.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(WishError::NotFound { id: wish.id });
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> WishResult<()> {
        let result = sqlx::query("DELETE FROM wishes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(WishError::NotFound { id });
        }
        Ok(())
    }

    async fn stats(&self, owner_email: &str) -> WishResult<WishStats> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE is_bought) AS bought
            FROM wishes
            WHERE owner_email = $1
            "#,
        )
        .bind(owner_email)
        .fetch_one(&self.pool)
        .await?;

        Ok(WishStats::from_counts(row.get("total"), row.get("bought")))
    }
}
