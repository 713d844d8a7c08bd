//! Product repository: listings, manager edits and supply requests.
//!
//! Edits and supply requests write their audit row in the same transaction
//! as the inventory change.

use sqlx::{PgExecutor, PgPool};
use tracing::{debug, instrument};

use marketplace_core::{Price, RequestNumber, StoreId};

use super::{RepositoryError, map_constraint};
use crate::models::{NewSupplyRequest, Product, ProductEdit};

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    store_id: i32,
    product_name: String,
    units: i32,
    price: Price,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            store_id: StoreId::new(row.store_id),
            name: row.product_name,
            units: row.units,
            price: row.price,
        }
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Products of a store, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_store(&self, store: StoreId) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT storeID AS store_id,
                   TRIM(productName) AS product_name,
                   numberOfUnits AS units,
                   pricePerUnit::numeric AS price
            FROM Product
            WHERE storeID = $1
            ORDER BY productName
            ",
        )
        .bind(store)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Units in stock, `None` if the store does not carry the product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn units(&self, store: StoreId, product: &str) -> Result<Option<i32>, RepositoryError> {
        let row: Option<(i32,)> = sqlx::query_as(
            r"
            SELECT numberOfUnits
            FROM Product
            WHERE storeID = $1 AND productName = $2
            ",
        )
        .bind(store)
        .bind(product)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(units,)| units))
    }

    /// Insert a product (seeding only).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if it already exists or the store
    /// is unknown.
    pub async fn insert(&self, product: &Product) -> Result<(), RepositoryError> {
        Self::insert_with(self.pool, product).await
    }

    /// [`ProductRepository::insert`] through `executor`, a pool or an open
    /// transaction.
    ///
    /// # Errors
    ///
    /// Same as [`ProductRepository::insert`].
    pub async fn insert_with<'e>(
        executor: impl PgExecutor<'e>,
        product: &Product,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO Product (storeID, productName, numberOfUnits, pricePerUnit)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(product.store_id)
        .bind(&product.name)
        .bind(product.units)
        .bind(product.price)
        .execute(executor)
        .await
        .map_err(map_constraint)?;

        Ok(())
    }

    /// Overwrite units and price, and record the edit in `ProductUpdates`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store does not carry the
    /// product (nothing is written), `RepositoryError::Conflict` on a
    /// constraint violation such as negative units.
    #[instrument(skip(self, edit), fields(store = %edit.store_id, product = %edit.product_name))]
    pub async fn apply_edit(&self, edit: &ProductEdit) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r"
            UPDATE Product
            SET numberOfUnits = $1, pricePerUnit = $2
            WHERE storeID = $3 AND productName = $4
            ",
        )
        .bind(edit.units)
        .bind(edit.price)
        .bind(edit.store_id)
        .bind(&edit.product_name)
        .execute(&mut *tx)
        .await
        .map_err(map_constraint)?;

        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query(
            r"
            INSERT INTO ProductUpdates (managerID, storeID, productName, updatedOn)
            VALUES ($1, $2, $3, LOCALTIMESTAMP)
            ",
        )
        .bind(edit.manager_id)
        .bind(edit.store_id)
        .bind(&edit.product_name)
        .execute(&mut *tx)
        .await
        .map_err(map_constraint)?;

        tx.commit().await?;
        debug!(units = edit.units, "Product updated");
        Ok(())
    }

    /// Record a supply request and add the requested units to stock.
    ///
    /// The increment is a single `numberOfUnits + $n` statement, so concurrent
    /// requests do not lose updates.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store does not carry the
    /// product (nothing is written).
    #[instrument(skip(self, request), fields(store = %request.store_id, product = %request.product_name))]
    pub async fn request_supply(
        &self,
        request: &NewSupplyRequest,
    ) -> Result<RequestNumber, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r"
            UPDATE Product
            SET numberOfUnits = numberOfUnits + $1
            WHERE storeID = $2 AND productName = $3
            ",
        )
        .bind(request.units)
        .bind(request.store_id)
        .bind(&request.product_name)
        .execute(&mut *tx)
        .await
        .map_err(map_constraint)?;

        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        let (number,): (i32,) = sqlx::query_as(
            r"
            INSERT INTO ProductSupplyRequests
                (managerID, warehouseID, storeID, productName, unitsRequested)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING requestNumber
            ",
        )
        .bind(request.manager_id)
        .bind(request.warehouse_id)
        .bind(request.store_id)
        .bind(&request.product_name)
        .bind(request.units)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_constraint)?;

        tx.commit().await?;
        debug!(request_number = number, units = request.units, "Supply requested");
        Ok(RequestNumber::new(number))
    }
}
