//! Database connection settings
//!
//! Resolved from flags, then environment (after `.env` is loaded), then
//! defaults. A full `DATABASE_URL` wins over the discrete `DB_*` parts.

use anyhow::{Context, Result};
use clap::Args;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

#[derive(Args, Debug, Clone)]
pub struct DbArgs {
    /// Full connection string; overrides the individual --db-* options
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Database host
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// Database port
    #[arg(long, env = "DB_PORT", default_value_t = 5432)]
    pub db_port: u16,

    /// Database user
    #[arg(long, env = "DB_USER", default_value = "postgres")]
    pub db_user: String,

    /// Database password
    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// Database name
    #[arg(long, env = "DB_NAME", default_value = "wishlist")]
    pub db_name: String,

    /// TLS mode (disable, allow, prefer, require, verify-ca, verify-full)
    #[arg(long, env = "DB_SSLMODE", default_value = "disable")]
    pub db_sslmode: String,
}

impl DbArgs {
    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        if let Some(url) = &self.database_url {
            return url.parse().context("Invalid DATABASE_URL");
        }

        let ssl_mode: PgSslMode = self
            .db_sslmode
            .parse()
            .with_context(|| format!("Invalid DB_SSLMODE '{}'", self.db_sslmode))?;

        let mut options = PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .database(&self.db_name)
            .ssl_mode(ssl_mode);

        if let Some(password) = &self.db_password {
            options = options.password(password);
        }

        Ok(options)
    }
}
