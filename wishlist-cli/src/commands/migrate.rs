//! Schema bootstrap command

use anyhow::{Context, Result};
use clap::Parser;

use wishlist_server::db::{create_pool_with_options, migrations};

use crate::config::DbArgs;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

/// Create the wishes table and exit
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let pool = create_pool_with_options(args.db.connect_options()?, 1)
        .await
        .context("Failed to connect to database")?;

    let result = migrations::run(&pool)
        .await
        .context("Failed to run migrations");
    pool.close().await;

    result
}
