//! Database access for the marketplace `PostgreSQL` schema.
//!
//! ## Tables
//!
//! - `Users` - Customers and managers (plain-text passwords, grid coordinates)
//! - `Store` - Stores and their managing user
//! - `Product` - Inventory per store, keyed by (`storeID`, `productName`)
//! - `Orders` - Customer orders (serial `orderNumber`)
//! - `ProductUpdates` - Audit log of manager product edits
//! - `ProductSupplyRequests` - Supply requests sent to warehouses
//!
//! # Migrations
//!
//! Migrations are stored in `crates/console/migrations/` and run via:
//! ```bash
//! marketplace migrate <dbname> <port> <user>
//! ```

pub mod executor;
pub mod orders;
pub mod products;
pub mod reports;
pub mod stores;
pub mod users;

use std::time::Duration;

use sqlx::PgPool;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crate::config::{ConfigError, DatabaseConfig};

pub use executor::{Executor, Statement, TextRow, TextTable, write_table};
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use reports::ReportRepository;
pub use stores::StoreRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (duplicate key, dangling reference, failed check).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A guarded stock decrement found fewer units than requested.
    #[error("only {available} units left")]
    InsufficientStock {
        /// Units on hand when the decrement was refused.
        available: i32,
    },

    /// A result column has a type the text executor cannot render.
    #[error("unsupported column type {type_name} for column {column}")]
    UnsupportedColumn {
        /// Column name from the result set.
        column: String,
        /// `PostgreSQL` type name.
        type_name: String,
    },

    /// Writing query output failed.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Errors that can occur while opening the connection.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Configuration could not be turned into connect options.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The server could not be reached or refused the login.
    #[error("unable to connect to database: {0}")]
    Database(#[from] sqlx::Error),
}

/// Open the connection pool.
///
/// The console is a single sequential loop, so the pool holds exactly one
/// physical connection; every statement borrows it for its own duration.
///
/// # Errors
///
/// Returns `ConnectError` if the options are invalid or the connection cannot
/// be established.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, ConnectError> {
    let options = config.connect_options()?;
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Bundled schema migrations (`crates/console/migrations/`).
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Apply every pending migration.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the applied history does
/// not match the bundled files.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

/// Map a unique/foreign-key/check violation to `RepositoryError::Conflict`.
pub(crate) fn map_constraint(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && (db_err.is_unique_violation()
            || db_err.is_foreign_key_violation()
            || db_err.is_check_violation())
    {
        return RepositoryError::Conflict(db_err.message().to_owned());
    }
    RepositoryError::Database(e)
}
