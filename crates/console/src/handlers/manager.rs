//! Manager handlers: product edits, supply requests and reports.
//!
//! Every handler checks the session role before touching the database and
//! only acts on stores the caller manages.

use std::io::{BufRead, Write};

use tracing::info;

use marketplace_core::{Price, RequestNumber, StoreId, WarehouseId};

use super::{HandlerError, Handlers, Outcome, REPORT_LIMIT, Refusal};
use crate::db::{ProductRepository, ReportRepository, RepositoryError, StoreRepository};
use crate::models::{
    NewSupplyRequest, PopularCustomer, PopularProduct, Product, ProductEdit, ProductUpdate, User,
    most_recent,
};

/// Number of audit entries shown by the recent updates report.
const RECENT_UPDATES: usize = 5;

impl<R: BufRead, W: Write, E: Write> Handlers<'_, R, W, E> {
    /// The stores `user` manages, or why the user cannot act on any.
    async fn managed_stores(&self, user: &User) -> Result<Result<Vec<StoreId>, Refusal>, HandlerError> {
        if !user.role.is_manager() {
            return Ok(Err(Refusal::NotManager));
        }
        let stores = StoreRepository::new(self.pool).managed_by(user.id).await?;
        if stores.is_empty() {
            return Ok(Err(Refusal::NoManagedStores));
        }
        Ok(Ok(stores))
    }

    /// List the caller's stores and prompt for one of them.
    async fn choose_store(&mut self, user: &User) -> Result<Result<StoreId, Refusal>, HandlerError> {
        let stores = match self.managed_stores(user).await? {
            Ok(stores) => stores,
            Err(reason) => return Ok(Err(reason)),
        };

        let listed = stores
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(self.console.out(), "Stores you manage: {listed}")?;

        let store: StoreId = self
            .console
            .prompt_parse("Enter store ID: ", "store ID", "a whole number")?;
        if stores.contains(&store) {
            Ok(Ok(store))
        } else {
            Ok(Err(Refusal::NotYourStore(store)))
        }
    }

    fn print_products(&mut self, products: &[Product]) -> Result<(), HandlerError> {
        for product in products {
            writeln!(
                self.console.out(),
                "{}\t{} units\t{}",
                product.name,
                product.units,
                product.price
            )?;
        }
        Ok(())
    }

    /// Overwrite a product's units and price and log the edit.
    ///
    /// # Errors
    ///
    /// `HandlerError::Console` for malformed numbers,
    /// `HandlerError::Repository` if a statement fails.
    pub async fn update_product(&mut self, user: &User) -> Result<Outcome<()>, HandlerError> {
        let store_id = match self.choose_store(user).await? {
            Ok(store) => store,
            Err(reason) => return self.refuse(reason),
        };

        let products = ProductRepository::new(self.pool);
        let listing = products.list_for_store(store_id).await?;
        self.print_products(&listing)?;

        let product_name = self.console.prompt("Enter product name: ")?;
        let units: i32 = self.console.prompt_parse(
            "Enter new number of units: ",
            "units",
            "a whole number",
        )?;
        let price: Price = self.console.prompt_parse(
            "Enter new price per unit: ",
            "price",
            "a non-negative amount",
        )?;

        let edit = ProductEdit {
            manager_id: user.id,
            store_id,
            product_name,
            units,
            price,
        };
        match products.apply_edit(&edit).await {
            Ok(()) => {}
            Err(RepositoryError::NotFound) => {
                return self.refuse(Refusal::UnknownProduct {
                    store_id,
                    product: edit.product_name,
                });
            }
            Err(e) => return Err(e.into()),
        }

        info!(store = %store_id, product = %edit.product_name, "Product updated");
        writeln!(self.console.out(), "Product updated.")?;
        Ok(Outcome::Done(()))
    }

    /// Print the five most recent product updates across the caller's stores.
    ///
    /// # Errors
    ///
    /// `HandlerError::Repository` if the query fails.
    pub async fn view_recent_updates(
        &mut self,
        user: &User,
    ) -> Result<Outcome<Vec<ProductUpdate>>, HandlerError> {
        if let Err(reason) = self.managed_stores(user).await? {
            return self.refuse(reason);
        }

        let updates = ReportRepository::new(self.pool)
            .updates_for_manager(user.id)
            .await?;
        let recent = most_recent(updates, RECENT_UPDATES);

        self.console.heading("5 most recent product updates")?;
        for update in &recent {
            writeln!(
                self.console.out(),
                "#{}\tStore {}\t{}\t{}",
                update.update_number,
                update.store_id,
                update.product_name,
                update.updated_on.format("%Y-%m-%d %H:%M:%S")
            )?;
        }

        Ok(Outcome::Done(recent))
    }

    /// Print a store's best selling products by units ordered.
    ///
    /// # Errors
    ///
    /// `HandlerError::Repository` if the query fails.
    pub async fn view_popular_products(
        &mut self,
        user: &User,
    ) -> Result<Outcome<Vec<PopularProduct>>, HandlerError> {
        let store = match self.choose_store(user).await? {
            Ok(store) => store,
            Err(reason) => return self.refuse(reason),
        };

        let popular = ReportRepository::new(self.pool)
            .popular_products(store, REPORT_LIMIT)
            .await?;

        self.console.heading(&format!("5 most popular products of Store {store}"))?;
        for product in &popular {
            writeln!(
                self.console.out(),
                "{}\t{} units ordered",
                product.product_name,
                product.total_ordered
            )?;
        }

        Ok(Outcome::Done(popular))
    }

    /// Print a store's customers with the most orders.
    ///
    /// # Errors
    ///
    /// `HandlerError::Repository` if the query fails.
    pub async fn view_popular_customers(
        &mut self,
        user: &User,
    ) -> Result<Outcome<Vec<PopularCustomer>>, HandlerError> {
        let store = match self.choose_store(user).await? {
            Ok(store) => store,
            Err(reason) => return self.refuse(reason),
        };

        let popular = ReportRepository::new(self.pool)
            .popular_customers(store, REPORT_LIMIT)
            .await?;

        self.console.heading(&format!("5 most popular customers of Store {store}"))?;
        for customer in &popular {
            writeln!(
                self.console.out(),
                "User {}\t{}\t{} orders",
                customer.user_id,
                customer.name,
                customer.order_count
            )?;
        }

        Ok(Outcome::Done(popular))
    }

    /// Request units of a product from a warehouse and add them to stock.
    ///
    /// # Errors
    ///
    /// `HandlerError::Console` for malformed numbers,
    /// `HandlerError::Repository` if a statement fails.
    pub async fn place_supply_request(
        &mut self,
        user: &User,
    ) -> Result<Outcome<RequestNumber>, HandlerError> {
        let store_id = match self.choose_store(user).await? {
            Ok(store) => store,
            Err(reason) => return self.refuse(reason),
        };

        let products = ProductRepository::new(self.pool);
        let listing = products.list_for_store(store_id).await?;
        self.print_products(&listing)?;

        let product_name = self.console.prompt("Enter product name: ")?;
        let units: i32 = self.console.prompt_parse(
            "Enter number of units needed: ",
            "units",
            "a whole number",
        )?;
        if units <= 0 {
            return self.refuse(Refusal::NonPositiveUnits);
        }
        let warehouse_id: WarehouseId = self.console.prompt_parse(
            "Enter warehouse ID: ",
            "warehouse ID",
            "a whole number",
        )?;

        let request = NewSupplyRequest {
            manager_id: user.id,
            warehouse_id,
            store_id,
            product_name,
            units,
        };
        let number = match products.request_supply(&request).await {
            Ok(number) => number,
            Err(RepositoryError::NotFound) => {
                return self.refuse(Refusal::UnknownProduct {
                    store_id,
                    product: request.product_name,
                });
            }
            Err(e) => return Err(e.into()),
        };

        info!(request_number = %number, store = %store_id, %warehouse_id, "Supply requested");
        writeln!(
            self.console.out(),
            "Supply request placed! Request number: {number}"
        )?;
        Ok(Outcome::Done(number))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use marketplace_core::{Coordinates, Role, UserId};

    use super::*;
    use crate::console::tests::{TestConsole, output, scripted};
    use crate::handlers::tests::offline_pool;

    fn customer() -> User {
        User {
            id: UserId::new(7),
            name: "alice".to_owned(),
            coordinates: Coordinates::new(10.0, 10.0),
            role: Role::Customer,
        }
    }

    fn assert_refused<T>(outcome: &Outcome<T>, console: TestConsole) {
        assert_eq!(outcome.refusal(), Some(&Refusal::NotManager));
        let (out, err) = output(console);
        assert!(out.is_empty(), "nothing prompted: {out:?}");
        assert_eq!(err, "Invalid permissions.\n\n");
    }

    #[tokio::test]
    async fn test_update_product_requires_manager() {
        let pool = offline_pool();
        let mut console = scripted("1\nWidget\n3\n2.50\n");
        let outcome = Handlers::new(&pool, &mut console)
            .update_product(&customer())
            .await
            .unwrap();
        assert_refused(&outcome, console);
    }

    #[tokio::test]
    async fn test_recent_updates_requires_manager() {
        let pool = offline_pool();
        let mut console = scripted("");
        let outcome = Handlers::new(&pool, &mut console)
            .view_recent_updates(&customer())
            .await
            .unwrap();
        assert_refused(&outcome, console);
    }

    #[tokio::test]
    async fn test_popular_products_requires_manager() {
        let pool = offline_pool();
        let mut console = scripted("1\n");
        let outcome = Handlers::new(&pool, &mut console)
            .view_popular_products(&customer())
            .await
            .unwrap();
        assert_refused(&outcome, console);
    }

    #[tokio::test]
    async fn test_popular_customers_requires_manager() {
        let pool = offline_pool();
        let mut console = scripted("1\n");
        let outcome = Handlers::new(&pool, &mut console)
            .view_popular_customers(&customer())
            .await
            .unwrap();
        assert_refused(&outcome, console);
    }

    #[tokio::test]
    async fn test_supply_request_requires_manager() {
        let pool = offline_pool();
        let mut console = scripted("1\nWidget\n10\n4\n");
        let outcome = Handlers::new(&pool, &mut console)
            .place_supply_request(&customer())
            .await
            .unwrap();
        assert_refused(&outcome, console);
    }
}
