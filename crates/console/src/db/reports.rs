//! Manager reports over orders and the product update log.

use chrono::NaiveDateTime;
use sqlx::PgPool;

use marketplace_core::{StoreId, UpdateNumber, UserId};

use super::RepositoryError;
use crate::models::{PopularCustomer, PopularProduct, ProductUpdate};

#[derive(Debug, sqlx::FromRow)]
struct UpdateRow {
    update_number: i32,
    manager_id: i32,
    store_id: i32,
    product_name: String,
    updated_on: NaiveDateTime,
}

#[derive(Debug, sqlx::FromRow)]
struct PopularProductRow {
    product_name: String,
    total_ordered: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct PopularCustomerRow {
    user_id: i32,
    name: String,
    order_count: i64,
}

/// Repository for report queries.
pub struct ReportRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportRepository<'a> {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every logged product update of every store the manager runs.
    ///
    /// Unordered; callers sort with [`crate::models::most_recent`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn updates_for_manager(
        &self,
        manager: UserId,
    ) -> Result<Vec<ProductUpdate>, RepositoryError> {
        let rows = sqlx::query_as::<_, UpdateRow>(
            r"
            SELECT u.updateNumber AS update_number,
                   u.managerID AS manager_id,
                   u.storeID AS store_id,
                   TRIM(u.productName) AS product_name,
                   u.updatedOn AS updated_on
            FROM ProductUpdates u
            JOIN Store s ON s.storeID = u.storeID
            WHERE s.managerID = $1
            ",
        )
        .bind(manager)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ProductUpdate {
                update_number: UpdateNumber::new(row.update_number),
                manager_id: UserId::new(row.manager_id),
                store_id: StoreId::new(row.store_id),
                product_name: row.product_name,
                updated_on: row.updated_on,
            })
            .collect())
    }

    /// Products of a store ranked by total units ordered.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn popular_products(
        &self,
        store: StoreId,
        limit: i64,
    ) -> Result<Vec<PopularProduct>, RepositoryError> {
        let rows = sqlx::query_as::<_, PopularProductRow>(
            r"
            SELECT TRIM(productName) AS product_name,
                   SUM(unitsOrdered)::int8 AS total_ordered
            FROM Orders
            WHERE storeID = $1
            GROUP BY productName
            ORDER BY total_ordered DESC, product_name
            LIMIT $2
            ",
        )
        .bind(store)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| PopularProduct {
                product_name: row.product_name,
                total_ordered: row.total_ordered,
            })
            .collect())
    }

    /// Customers of a store ranked by number of orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn popular_customers(
        &self,
        store: StoreId,
        limit: i64,
    ) -> Result<Vec<PopularCustomer>, RepositoryError> {
        let rows = sqlx::query_as::<_, PopularCustomerRow>(
            r"
            SELECT u.userID AS user_id,
                   TRIM(u.name) AS name,
                   COUNT(o.orderNumber) AS order_count
            FROM Users u
            JOIN Orders o ON u.userID = o.customerID
            WHERE o.storeID = $1
            GROUP BY u.userID, u.name
            ORDER BY order_count DESC, u.userID
            LIMIT $2
            ",
        )
        .bind(store)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| PopularCustomer {
                user_id: UserId::new(row.user_id),
                name: row.name,
                order_count: row.order_count,
            })
            .collect())
    }
}
