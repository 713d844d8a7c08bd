//! Order handlers: place order, recent orders.

use std::io::{BufRead, Write};

use tracing::{info, warn};

use marketplace_core::{NEARBY_RADIUS, OrderNumber, StoreId};

use super::{HandlerError, Handlers, Outcome, REPORT_LIMIT, Refusal};
use crate::db::{OrderRepository, ProductRepository, RepositoryError, StoreRepository, UserRepository};
use crate::models::{OrderRejection, OrderSummary, User, check_quantity, check_stock};

impl<R: BufRead, W: Write, E: Write> Handlers<'_, R, W, E> {
    /// Buy units of a product from a nearby store.
    ///
    /// Stock is re-checked by the guarded decrement when the order is
    /// written, so a sale that races this one is reported as insufficient
    /// units and nothing is recorded.
    ///
    /// # Errors
    ///
    /// `HandlerError::Console` for non-integer store ID or quantity,
    /// `HandlerError::Repository` if a query fails.
    pub async fn place_order(&mut self, user: &User) -> Result<Outcome<OrderNumber>, HandlerError> {
        let Some(origin) = UserRepository::new(self.pool).coordinates(user.id).await? else {
            return self.refuse(Refusal::UnknownUser);
        };

        let store: StoreId = self
            .console
            .prompt_parse("Enter store ID: ", "store ID", "a whole number")?;
        let Some(location) = StoreRepository::new(self.pool).coordinates(store).await? else {
            return self.refuse(OrderRejection::StoreNotFound(store).into());
        };

        let distance = origin.distance_to(&location);
        if distance >= NEARBY_RADIUS {
            return self.refuse(
                OrderRejection::TooFar {
                    store_id: store,
                    distance,
                }
                .into(),
            );
        }

        let product = self.console.prompt("Enter product name: ")?;
        let products = ProductRepository::new(self.pool);
        let available = match check_stock(store, &product, products.units(store, &product).await?) {
            Ok(units) => units,
            Err(rejection) => return self.refuse(rejection.into()),
        };

        writeln!(self.console.out(), "Units available: {available}")?;
        let requested: i32 = self.console.prompt_parse(
            "Enter number of units to purchase: ",
            "units",
            "a whole number",
        )?;
        if let Err(rejection) = check_quantity(available, requested) {
            return self.refuse(rejection.into());
        }

        let number = match OrderRepository::new(self.pool)
            .place(user.id, store, &product, requested)
            .await
        {
            Ok(number) => number,
            Err(RepositoryError::InsufficientStock { available }) => {
                warn!(%store, %product, available, requested, "Order lost a race for stock");
                return self.refuse(
                    OrderRejection::InsufficientUnits {
                        available,
                        requested,
                    }
                    .into(),
                );
            }
            Err(e) => return Err(e.into()),
        };

        info!(order_number = %number, customer = %user.id, %store, "Order placed");
        writeln!(self.console.out(), "Order placed! Order number: {number}")?;
        Ok(Outcome::Done(number))
    }

    /// Print the caller's most recent orders, newest first.
    ///
    /// # Errors
    ///
    /// `HandlerError::Repository` if the query fails.
    pub async fn view_recent_orders(&mut self, user: &User) -> Result<Vec<OrderSummary>, HandlerError> {
        let orders = OrderRepository::new(self.pool)
            .recent_for_customer(user.id, REPORT_LIMIT)
            .await?;

        self.console.heading("Your 5 most recent orders")?;
        for order in &orders {
            let out = self.console.out();
            writeln!(out, "Order number: {}", order.order_number)?;
            writeln!(out, "Store ID: {}", order.store_id)?;
            writeln!(out, "Product: {}", order.product_name)?;
            writeln!(out, "Units ordered: {}", order.units_ordered)?;
            writeln!(out, "Ordered at: {}", order.order_time.format("%Y-%m-%d %H:%M:%S"))?;
            self.console.separator()?;
        }
        if orders.is_empty() {
            writeln!(self.console.out(), "No orders yet.")?;
        }

        Ok(orders)
    }
}
