//! Menu loops.
//!
//! The main menu offers account creation and login; a successful login enters
//! the session menu until the user logs out. The logged-in user lives only in
//! the session loop.

use std::io::{BufRead, Write};

use sqlx::PgPool;
use tracing::{error, info};

use crate::console::{Console, ConsoleError};
use crate::handlers::{HandlerError, Handlers, Outcome};
use crate::models::User;

const BANNER: &str = "\
*******************************************************
              User Interface
*******************************************************
";

/// Interactive menus bound to a pool and a console.
pub struct Menu<'a, R, W, E> {
    pool: &'a PgPool,
    console: &'a mut Console<R, W, E>,
}

impl<'a, R: BufRead, W: Write, E: Write> Menu<'a, R, W, E> {
    pub const fn new(pool: &'a PgPool, console: &'a mut Console<R, W, E>) -> Self {
        Self { pool, console }
    }

    /// Run until the user exits or input ends.
    ///
    /// Handler failures such as database errors or malformed numbers are
    /// printed and the menu continues.
    ///
    /// # Errors
    ///
    /// Returns `HandlerError` only when the console itself fails.
    pub async fn run(mut self) -> Result<(), HandlerError> {
        write!(self.console.out(), "{BANNER}")?;
        match self.main_menu().await {
            Err(HandlerError::Console(ConsoleError::Closed)) => {
                info!("Input closed, leaving the menu");
                Ok(())
            }
            other => other,
        }
    }

    fn handlers(&mut self) -> Handlers<'_, R, W, E> {
        Handlers::new(self.pool, self.console)
    }

    async fn main_menu(&mut self) -> Result<(), HandlerError> {
        loop {
            let out = self.console.out();
            writeln!(out, "MAIN MENU")?;
            writeln!(out, "---------")?;
            writeln!(out, "1. Create user")?;
            writeln!(out, "2. Log in")?;
            writeln!(out, "9. < EXIT")?;

            match self.console.read_choice()? {
                1 => {
                    let result = self.handlers().create_user().await;
                    self.recover(result)?;
                }
                2 => {
                    let result = self.handlers().log_in().await;
                    if let Some(user) = self.recover(result)?.and_then(Outcome::done) {
                        self.session(&user).await?;
                    }
                }
                9 => return Ok(()),
                _ => writeln!(self.console.out(), "Unrecognized choice!")?,
            }
        }
    }

    async fn session(&mut self, user: &User) -> Result<(), HandlerError> {
        loop {
            let out = self.console.out();
            writeln!(out, "MAIN MENU")?;
            writeln!(out, "---------")?;
            writeln!(out, "1. View Stores within 30 miles")?;
            writeln!(out, "2. View Product List")?;
            writeln!(out, "3. Place a Order")?;
            writeln!(out, "4. View 5 recent orders")?;
            writeln!(out, ".........................")?;
            writeln!(out, "5. Update Product")?;
            writeln!(out, "6. View 5 recent Product Updates Info")?;
            writeln!(out, "7. View 5 Popular Items")?;
            writeln!(out, "8. View 5 Popular Customers")?;
            writeln!(out, "9. Place Product Supply Request to Warehouse")?;
            writeln!(out, ".........................")?;
            writeln!(out, "20. Log out")?;

            let choice = self.console.read_choice()?;
            let result = match choice {
                1 => self.handlers().view_stores(user).await.map(drop),
                2 => self.handlers().view_products().await.map(drop),
                3 => self.handlers().place_order(user).await.map(drop),
                4 => self.handlers().view_recent_orders(user).await.map(drop),
                5 => self.handlers().update_product(user).await.map(drop),
                6 => self.handlers().view_recent_updates(user).await.map(drop),
                7 => self.handlers().view_popular_products(user).await.map(drop),
                8 => self.handlers().view_popular_customers(user).await.map(drop),
                9 => self.handlers().place_supply_request(user).await.map(drop),
                20 => {
                    info!(user_id = %user.id, "User logged out");
                    return Ok(());
                }
                _ => {
                    writeln!(self.console.out(), "Unrecognized choice!")?;
                    continue;
                }
            };
            self.recover(result)?;
        }
    }

    /// Print a recoverable handler failure and carry on; pass the rest up.
    fn recover<T>(&mut self, result: Result<T, HandlerError>) -> Result<Option<T>, HandlerError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_recoverable() => {
                error!(error = %e, "Handler failed");
                writeln!(self.console.err(), "{e}")?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
