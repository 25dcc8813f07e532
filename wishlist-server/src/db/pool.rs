//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits. The pool connects
//! eagerly, so a returned pool has already reached the server once.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Create a PostgreSQL connection pool from a connection string.
///
/// # Errors
///
/// Returns an error if the URL is malformed or the server is unreachable.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool("postgres://postgres@localhost/wishlist").await?;
/// ```
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let options: PgConnectOptions = database_url.parse()?;
    create_pool_with_options(options, DEFAULT_MAX_CONNECTIONS).await
}

/// Create a PostgreSQL connection pool from discrete connection options.
pub async fn create_pool_with_options(
    options: PgConnectOptions,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    tracing::info!(max_connections, "database pool ready");
    Ok(pool)
}
