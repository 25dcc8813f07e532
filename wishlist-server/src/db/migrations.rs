//! Schema bootstrap for the wishes table
//!
//! Every statement is idempotent, so running at each startup is safe.

use sqlx::PgPool;

/// Create the `wishes` table and its owner index if missing.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running wishlist migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS wishes (
            id BIGSERIAL PRIMARY KEY,
            owner_email TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            is_bought BOOLEAN NOT NULL DEFAULT FALSE,
            bought_at TIMESTAMPTZ,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT wishes_bought_at_matches_flag
                CHECK ((is_bought AND bought_at IS NOT NULL)
                    OR (NOT is_bought AND bought_at IS NULL))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS wishes_owner_created_idx
            ON wishes (owner_email, created_at DESC)
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Wishlist migrations complete");
    Ok(())
}
