//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! marketplace migrate <dbname> <port> <user>
//! ```
//!
//! Migration files live in `crates/console/migrations/` and are embedded at
//! build time.

use std::io::Write;

use tracing::info;

use marketplace_console::config::ConnectionArgs;
use marketplace_console::db;

use super::{AppError, connect};

/// Apply pending migrations.
///
/// # Errors
///
/// Returns an error if connecting or a migration fails.
pub async fn run(args: &ConnectionArgs) -> Result<(), AppError> {
    let executor = connect(args).await?;

    info!("Running migrations...");
    db::run_migrations(executor.pool()).await?;
    info!("Migrations complete!");

    executor.close().await;
    writeln!(std::io::stdout(), "Migrations applied.")?;
    Ok(())
}
