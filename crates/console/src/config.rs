//! Database configuration resolved from command-line arguments and environment.
//!
//! # Resolution order
//!
//! 1. Positional arguments `<dbname> <port> <user>` (and `--host`)
//! 2. `DATABASE_URL`, only when no positional argument was given
//! 3. Individual environment variables
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - Full `PostgreSQL` connection string
//! - `MARKETPLACE_DB_NAME` - Database name
//! - `MARKETPLACE_DB_PORT` - Port (default: 5432)
//! - `MARKETPLACE_DB_USER` - Role to connect as
//! - `MARKETPLACE_DB_HOST` - Host (default: localhost)
//! - `MARKETPLACE_DB_PASSWORD` - Password (default: empty)

use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: &str = "5432";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing setting: {0} (pass it as an argument or set the environment variable)")]
    MissingSetting(String),
    #[error("Invalid setting {0}: {1}")]
    InvalidSetting(String, String),
}

/// Connection arguments shared by the console and every subcommand.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConnectionArgs {
    /// Database name
    pub dbname: Option<String>,

    /// Database port
    pub port: Option<u16>,

    /// Database user
    pub user: Option<String>,

    /// Database host
    #[arg(long)]
    pub host: Option<String>,
}

impl ConnectionArgs {
    const fn has_positional(&self) -> bool {
        self.dbname.is_some() || self.port.is_some() || self.user.is_some()
    }
}

/// Where to connect.
#[derive(Clone)]
pub enum DatabaseConfig {
    /// A complete connection URL (contains the password).
    Url(SecretString),
    /// Individual connection settings.
    Parts {
        host: String,
        port: u16,
        dbname: String,
        user: String,
        password: SecretString,
    },
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(_) => f.debug_tuple("Url").field(&"[REDACTED]").finish(),
            Self::Parts {
                host,
                port,
                dbname,
                user,
                ..
            } => f
                .debug_struct("Parts")
                .field("host", host)
                .field("port", port)
                .field("dbname", dbname)
                .field("user", user)
                .field("password", &"[REDACTED]")
                .finish(),
        }
    }
}

impl DatabaseConfig {
    /// Load configuration from arguments and the process environment.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required setting is missing or invalid.
    pub fn from_env(args: &ConnectionArgs) -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::resolve(args, |key| std::env::var(key).ok())
    }

    /// Resolve configuration from arguments and an environment lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required setting is missing or invalid.
    pub fn resolve(
        args: &ConnectionArgs,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if !args.has_positional()
            && let Some(url) = env("DATABASE_URL")
        {
            return Ok(Self::Url(SecretString::from(url)));
        }

        let dbname = required(args.dbname.clone(), "MARKETPLACE_DB_NAME", &env)?;
        let user = required(args.user.clone(), "MARKETPLACE_DB_USER", &env)?;
        let port = match args.port {
            Some(port) => port,
            None => {
                let raw = env("MARKETPLACE_DB_PORT").unwrap_or_else(|| DEFAULT_PORT.to_owned());
                raw.parse::<u16>().map_err(|e| {
                    ConfigError::InvalidSetting("MARKETPLACE_DB_PORT".to_owned(), e.to_string())
                })?
            }
        };
        let host = args
            .host
            .clone()
            .or_else(|| env("MARKETPLACE_DB_HOST"))
            .unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let password = SecretString::from(env("MARKETPLACE_DB_PASSWORD").unwrap_or_default());

        Ok(Self::Parts {
            host,
            port,
            dbname,
            user,
            password,
        })
    }

    /// Build `sqlx` connect options.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSetting` if the URL cannot be parsed.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        match self {
            Self::Url(url) => PgConnectOptions::from_str(url.expose_secret())
                .map_err(|e| ConfigError::InvalidSetting("DATABASE_URL".to_owned(), e.to_string())),
            Self::Parts {
                host,
                port,
                dbname,
                user,
                password,
            } => Ok(PgConnectOptions::new()
                .host(host)
                .port(*port)
                .database(dbname)
                .username(user)
                .password(password.expose_secret())),
        }
    }

    /// Human-readable target for log lines (no secrets).
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Url(_) => "DATABASE_URL".to_owned(),
            Self::Parts {
                host, port, dbname, ..
            } => format!("postgresql://{host}:{port}/{dbname}"),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Take the argument if given, otherwise a required environment variable.
fn required(
    arg: Option<String>,
    key: &str,
    env: &impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    arg.or_else(|| env(key))
        .ok_or_else(|| ConfigError::MissingSetting(key.to_owned()))
}
