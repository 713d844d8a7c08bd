//! Order repository.
//!
//! Order numbers come from the `Orders.orderNumber` serial column. Placing an
//! order decrements stock in the same transaction, guarded so stock never
//! goes negative.

use chrono::NaiveDateTime;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};

use marketplace_core::{OrderNumber, StoreId, UserId};

use super::{RepositoryError, map_constraint};
use crate::models::OrderSummary;

/// Internal row type for order history queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    order_number: i32,
    store_id: i32,
    product_name: String,
    units_ordered: i32,
    order_time: NaiveDateTime,
}

impl From<OrderRow> for OrderSummary {
    fn from(row: OrderRow) -> Self {
        Self {
            order_number: OrderNumber::new(row.order_number),
            store_id: StoreId::new(row.store_id),
            product_name: row.product_name,
            units_ordered: row.units_ordered,
            order_time: row.order_time,
        }
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Take `units` out of stock and record the order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InsufficientStock` if stock dropped below
    /// `units` since it was checked (nothing is written),
    /// `RepositoryError::Conflict` if the order row violates a constraint,
    /// `RepositoryError::Database` for other failures.
    #[instrument(skip(self))]
    pub async fn place(
        &self,
        customer: UserId,
        store: StoreId,
        product: &str,
        units: i32,
    ) -> Result<OrderNumber, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let taken = sqlx::query(
            r"
            UPDATE Product
            SET numberOfUnits = numberOfUnits - $1
            WHERE storeID = $2 AND productName = $3 AND numberOfUnits >= $1
            ",
        )
        .bind(units)
        .bind(store)
        .bind(product)
        .execute(&mut *tx)
        .await?;

        if taken.rows_affected() == 0 {
            let available: Option<i32> = sqlx::query_scalar(
                "SELECT numberOfUnits FROM Product WHERE storeID = $1 AND productName = $2",
            )
            .bind(store)
            .bind(product)
            .fetch_optional(&mut *tx)
            .await?;
            let available = available.unwrap_or(0);
            warn!(available, "Stock changed before the order was written");
            return Err(RepositoryError::InsufficientStock { available });
        }

        let (number,): (i32,) = sqlx::query_as(
            r"
            INSERT INTO Orders (customerID, storeID, productName, unitsOrdered, orderTime)
            VALUES ($1, $2, $3, $4, LOCALTIMESTAMP)
            RETURNING orderNumber
            ",
        )
        .bind(customer)
        .bind(store)
        .bind(product)
        .bind(units)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_constraint)?;

        tx.commit().await?;
        debug!(order_number = number, "Order placed");
        Ok(OrderNumber::new(number))
    }

    /// A customer's most recent orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent_for_customer(
        &self,
        customer: UserId,
        limit: i64,
    ) -> Result<Vec<OrderSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT orderNumber AS order_number,
                   storeID AS store_id,
                   TRIM(productName) AS product_name,
                   unitsOrdered AS units_ordered,
                   orderTime AS order_time
            FROM Orders
            WHERE customerID = $1
            ORDER BY orderTime DESC, orderNumber DESC
            LIMIT $2
            ",
        )
        .bind(customer)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderSummary::from).collect())
    }
}
