//! Seed the database with sample users, stores and products.
//!
//! The file is parsed and validated before connecting. See
//! [`marketplace_console::seed`] for the format.

use std::io::Write;
use std::path::Path;

use tracing::info;

use marketplace_console::config::ConnectionArgs;
use marketplace_console::seed::{SeedError, load, seed, validate};

use super::{AppError, connect};

/// Seed from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is invalid, connecting
/// fails, or an insert fails.
pub async fn run(path: &Path, args: &ConnectionArgs) -> Result<(), AppError> {
    info!(path = %path.display(), "Loading seed file");

    let file = load(path).await?;

    let errors = validate(&file);
    if !errors.is_empty() {
        return Err(SeedError::Invalid(errors).into());
    }

    let executor = connect(args).await?;
    let result = seed(executor.pool(), &file).await?;
    executor.close().await;

    writeln!(
        std::io::stdout(),
        "Seeded {} users, {} stores, {} products.",
        result.users, result.stores, result.products
    )?;
    Ok(())
}
