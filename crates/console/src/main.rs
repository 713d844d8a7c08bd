//! Marketplace console and operator tools.
//!
//! # Usage
//!
//! ```bash
//! # Interactive console
//! marketplace <dbname> <port> <user>
//!
//! # Apply the bundled schema
//! marketplace migrate <dbname> <port> <user>
//!
//! # Load sample users, stores and products
//! marketplace seed crates/console/seed/sample.yaml <dbname> <port> <user>
//!
//! # Ad hoc statements
//! marketplace sql "SELECT * FROM Store" --json
//! marketplace exec "DELETE FROM Orders WHERE storeID = 3"
//! ```
//!
//! Connection arguments may be left out when `DATABASE_URL` or the
//! `MARKETPLACE_DB_*` variables are set (see [`marketplace_console::config`]).
//!
//! # Logging
//!
//! Logs go to stderr, filtered by `RUST_LOG` (default: warnings from this
//! crate). `MARKETPLACE_LOG_FORMAT=json` switches to JSON lines.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marketplace_console::config::ConnectionArgs;

mod commands;

#[derive(Parser)]
#[command(name = "marketplace")]
#[command(author, version, about = "Marketplace console")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(flatten)]
    conn: ConnectionArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply database migrations
    Migrate {
        #[command(flatten)]
        conn: ConnectionArgs,
    },
    /// Load users, stores and products from a YAML file
    Seed {
        /// Path to the seed file
        file: PathBuf,

        #[command(flatten)]
        conn: ConnectionArgs,
    },
    /// Run a query and print its rows
    Sql {
        /// SQL query
        statement: String,

        /// Print rows as a JSON array instead of tab-separated text
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        conn: ConnectionArgs,
    },
    /// Run a statement and print the number of affected rows
    Exec {
        /// SQL statement
        statement: String,

        #[command(flatten)]
        conn: ConnectionArgs,
    },
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "marketplace=warn,marketplace_console=warn".into());

    let is_json = std::env::var("MARKETPLACE_LOG_FORMAT").is_ok_and(|format| format == "json");
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::AppError> {
    match cli.command {
        None => commands::console::run(&cli.conn).await,
        Some(Commands::Migrate { conn }) => commands::migrate::run(&conn).await,
        Some(Commands::Seed { file, conn }) => commands::seed::run(&file, &conn).await,
        Some(Commands::Sql {
            statement,
            json,
            conn,
        }) => commands::sql::query(&statement, json, &conn).await,
        Some(Commands::Exec { statement, conn }) => commands::sql::exec(&statement, &conn).await,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_connection_arguments() {
        let cli = Cli::try_parse_from(["marketplace", "shop", "5432", "alice"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.conn.dbname.as_deref(), Some("shop"));
        assert_eq!(cli.conn.port, Some(5432));
        assert_eq!(cli.conn.user.as_deref(), Some("alice"));
    }

    #[test]
    fn test_sql_subcommand() {
        let cli = Cli::try_parse_from(["marketplace", "sql", "SELECT 1", "--json", "shop"]).unwrap();
        match cli.command {
            Some(Commands::Sql {
                statement,
                json,
                conn,
            }) => {
                assert_eq!(statement, "SELECT 1");
                assert!(json);
                assert_eq!(conn.dbname.as_deref(), Some("shop"));
            }
            _ => panic!("expected sql subcommand"),
        }
    }
}
