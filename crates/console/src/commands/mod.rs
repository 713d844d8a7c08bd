//! Subcommand implementations.
//!
//! - `console` - Interactive menus (default)
//! - `migrate` - Apply the bundled schema
//! - `seed` - Load sample data
//! - `sql` - Ad hoc queries and statements

pub mod console;
pub mod migrate;
pub mod seed;
pub mod sql;

use thiserror::Error;
use tracing::info;

use marketplace_console::config::{ConfigError, ConnectionArgs, DatabaseConfig};
use marketplace_console::db::{self, ConnectError, Executor, RepositoryError};
use marketplace_console::handlers::HandlerError;
use marketplace_console::seed::SeedError;

/// Errors that end a command with a non-zero exit code.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Seed(#[from] SeedError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Console(#[from] HandlerError),

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Resolve settings and open the single-connection pool.
async fn connect(args: &ConnectionArgs) -> Result<Executor, AppError> {
    let config = DatabaseConfig::from_env(args)?;
    info!(database = %config.describe(), "Connecting to database");
    let pool = db::create_pool(&config).await?;
    info!("Connected to database");
    Ok(Executor::new(pool))
}
