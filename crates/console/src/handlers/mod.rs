//! Use-case handlers, one per menu action.
//!
//! Each handler prompts through the [`Console`], runs bound statements through
//! a repository, and prints the result. Business-rule refusals (store too far,
//! not a manager, ...) are printed and returned as [`Outcome::Refused`];
//! they are normal control flow, not errors.
//!
//! - [`account`] - create user, log in
//! - [`browse`] - nearby stores, product list
//! - [`orders`] - place order, recent orders
//! - [`manager`] - product updates, supply requests, reports

pub mod account;
pub mod browse;
pub mod manager;
pub mod orders;

use std::io::{self, BufRead, Write};

use sqlx::PgPool;
use thiserror::Error;

use marketplace_core::StoreId;

use crate::console::{Console, ConsoleError};
use crate::db::RepositoryError;
use crate::models::OrderRejection;

/// Rows shown by the "top five" style listings.
pub const REPORT_LIMIT: i64 = 5;

/// Errors that abort a handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Console failure or unusable input.
    #[error(transparent)]
    Console(#[from] ConsoleError),

    /// Database failure.
    #[error("An error occurred: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<io::Error> for HandlerError {
    fn from(e: io::Error) -> Self {
        Self::Console(ConsoleError::Io(e))
    }
}

impl HandlerError {
    /// Whether the menu loop can continue after this error.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::Console(ConsoleError::Closed | ConsoleError::Io(_))
        )
    }
}

/// Why a handler declined to act.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Refusal {
    #[error("Invalid permissions.")]
    NotManager,
    #[error("You don't manage any stores.")]
    NoManagedStores,
    #[error("You don't manage Store {0}.")]
    NotYourStore(StoreId),
    #[error("Product {product} not found at Store {store_id}.")]
    UnknownProduct {
        store_id: StoreId,
        product: String,
    },
    #[error("Units must be at least 1.")]
    NonPositiveUnits,
    #[error("Invalid name or password.")]
    InvalidCredentials,
    #[error("User not found.")]
    UnknownUser,
    #[error(transparent)]
    Order(#[from] OrderRejection),
}

/// Result of a handler that completed without error.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The action ran.
    Done(T),
    /// The action was declined; the reason has been printed.
    Refused(Refusal),
}

impl<T> Outcome<T> {
    /// The value of a completed action.
    pub fn done(self) -> Option<T> {
        match self {
            Self::Done(value) => Some(value),
            Self::Refused(_) => None,
        }
    }

    /// The refusal reason, if any.
    pub const fn refusal(&self) -> Option<&Refusal> {
        match self {
            Self::Done(_) => None,
            Self::Refused(reason) => Some(reason),
        }
    }
}

/// Handler context: the pool and the console of the current session.
pub struct Handlers<'a, R, W, E> {
    pool: &'a PgPool,
    console: &'a mut Console<R, W, E>,
}

impl<'a, R: BufRead, W: Write, E: Write> Handlers<'a, R, W, E> {
    /// Bind handlers to a pool and a console.
    pub const fn new(pool: &'a PgPool, console: &'a mut Console<R, W, E>) -> Self {
        Self { pool, console }
    }

    /// Print a refusal and wrap it.
    ///
    /// Permission refusals go to the error stream, everything else to output.
    fn refuse<T>(&mut self, reason: Refusal) -> Result<Outcome<T>, HandlerError> {
        match reason {
            Refusal::NotManager => writeln!(self.console.err(), "{reason}\n")?,
            _ => writeln!(self.console.out(), "{reason}")?,
        }
        tracing::debug!(%reason, "Action refused");
        Ok(Outcome::Refused(reason))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use sqlx::postgres::PgPoolOptions;

    use super::*;
    use crate::console::tests::{output, scripted};

    /// Pool that never connects; usable for paths that refuse before any
    /// statement runs.
    pub(crate) fn offline_pool() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy("postgres://nobody@localhost:1/none")
            .unwrap()
    }

    #[tokio::test]
    async fn test_refusal_goes_to_output() {
        let pool = offline_pool();
        let mut console = scripted("");
        let outcome = Handlers::new(&pool, &mut console)
            .refuse::<()>(Refusal::InvalidCredentials)
            .unwrap();

        assert_eq!(outcome.refusal(), Some(&Refusal::InvalidCredentials));
        let (out, err) = output(console);
        assert_eq!(out, "Invalid name or password.\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_order_rejection_message_passes_through() {
        let refusal = Refusal::from(OrderRejection::NonPositiveQuantity);
        assert_eq!(refusal.to_string(), "Units to purchase must be at least 1.");
    }

    #[test]
    fn test_closed_input_is_not_recoverable() {
        assert!(!HandlerError::from(ConsoleError::Closed).is_recoverable());
        assert!(
            HandlerError::from(ConsoleError::InvalidInput {
                field: "units",
                expected: "a whole number",
                value: "x".to_owned(),
            })
            .is_recoverable()
        );
        assert!(HandlerError::from(RepositoryError::NotFound).is_recoverable());
    }

    #[test]
    fn test_outcome_accessors() {
        assert_eq!(Outcome::Done(3).done(), Some(3));
        let refused: Outcome<i32> = Outcome::Refused(Refusal::NotManager);
        assert_eq!(refused.refusal(), Some(&Refusal::NotManager));
        assert_eq!(refused.done(), None);
    }
}
