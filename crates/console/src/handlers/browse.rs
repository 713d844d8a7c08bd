//! Browsing handlers: nearby stores and store product lists.

use std::io::{BufRead, Write};

use marketplace_core::StoreId;

use super::{HandlerError, Handlers, Outcome, Refusal};
use crate::db::{ProductRepository, StoreRepository, UserRepository};
use crate::models::{NearbyStore, Product, User, nearby_stores};

impl<R: BufRead, W: Write, E: Write> Handlers<'_, R, W, E> {
    /// List stores strictly within the nearby radius of the user's stored location.
    ///
    /// # Errors
    ///
    /// `HandlerError::Repository` if a query fails.
    pub async fn view_stores(
        &mut self,
        user: &User,
    ) -> Result<Outcome<Vec<NearbyStore>>, HandlerError> {
        let Some(origin) = UserRepository::new(self.pool).coordinates(user.id).await? else {
            return self.refuse(Refusal::UnknownUser);
        };
        let stores = StoreRepository::new(self.pool).list().await?;
        let nearby = nearby_stores(&origin, stores);

        self.console.heading("Stores within 30 miles of you")?;
        for entry in &nearby {
            let out = self.console.out();
            writeln!(out, "Store ID: {}", entry.store.id)?;
            writeln!(out, "Name: {}", entry.store.name)?;
            writeln!(out, "Distance: {:.2} miles", entry.distance)?;
            self.console.separator()?;
        }
        if nearby.is_empty() {
            writeln!(self.console.out(), "No stores nearby.")?;
        }

        Ok(Outcome::Done(nearby))
    }

    /// Prompt for a store and list its products.
    ///
    /// # Errors
    ///
    /// `HandlerError::Console` for a non-integer store ID,
    /// `HandlerError::Repository` if the query fails.
    pub async fn view_products(&mut self) -> Result<Vec<Product>, HandlerError> {
        let store: StoreId = self
            .console
            .prompt_parse("Enter store ID: ", "store ID", "a whole number")?;
        let products = ProductRepository::new(self.pool).list_for_store(store).await?;

        self.console.heading(&format!("Items in Store {store}"))?;
        for product in &products {
            let out = self.console.out();
            writeln!(out, "Item: {}", product.name)?;
            writeln!(out, "Units available: {}", product.units)?;
            writeln!(out, "Price: {}", product.price)?;
            self.console.separator()?;
        }
        if products.is_empty() {
            writeln!(self.console.out(), "No items found.")?;
        }

        Ok(products)
    }
}
