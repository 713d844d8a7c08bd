//! Store repository. Stores are read-only to the console.

use sqlx::{PgExecutor, PgPool};

use marketplace_core::{Coordinates, StoreId, UserId};

use super::RepositoryError;
use crate::models::Store;

/// Internal row type for store queries.
#[derive(Debug, sqlx::FromRow)]
struct StoreRow {
    store_id: i32,
    name: String,
    latitude: f64,
    longitude: f64,
    manager_id: i32,
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Self {
            id: StoreId::new(row.store_id),
            name: row.name,
            coordinates: Coordinates::new(row.latitude, row.longitude),
            manager_id: UserId::new(row.manager_id),
        }
    }
}

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every store, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Store>, RepositoryError> {
        let rows = sqlx::query_as::<_, StoreRow>(
            r"
            SELECT storeID AS store_id,
                   TRIM(name) AS name,
                   latitude::float8 AS latitude,
                   longitude::float8 AS longitude,
                   managerID AS manager_id
            FROM Store
            ORDER BY storeID
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Store::from).collect())
    }

    /// Coordinates of one store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn coordinates(&self, id: StoreId) -> Result<Option<Coordinates>, RepositoryError> {
        let row: Option<(f64, f64)> = sqlx::query_as(
            r"
            SELECT latitude::float8, longitude::float8
            FROM Store
            WHERE storeID = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(latitude, longitude)| Coordinates::new(latitude, longitude)))
    }

    /// IDs of the stores a user manages, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn managed_by(&self, manager: UserId) -> Result<Vec<StoreId>, RepositoryError> {
        let ids: Vec<(i32,)> = sqlx::query_as(
            r"
            SELECT storeID
            FROM Store
            WHERE managerID = $1
            ORDER BY storeID
            ",
        )
        .bind(manager)
        .fetch_all(self.pool)
        .await?;

        Ok(ids.into_iter().map(|(id,)| StoreId::new(id)).collect())
    }

    /// Insert a store with an explicit ID (seeding only).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the ID is taken or the manager
    /// does not exist.
    pub async fn insert(&self, store: &Store) -> Result<(), RepositoryError> {
        Self::insert_with(self.pool, store).await
    }

    /// [`StoreRepository::insert`] through `executor`, a pool or an open
    /// transaction.
    ///
    /// # Errors
    ///
    /// Same as [`StoreRepository::insert`].
    pub async fn insert_with<'e>(
        executor: impl PgExecutor<'e>,
        store: &Store,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO Store (storeID, name, latitude, longitude, managerID)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(store.id)
        .bind(&store.name)
        .bind(store.coordinates.latitude)
        .bind(store.coordinates.longitude)
        .bind(store.manager_id)
        .execute(executor)
        .await
        .map_err(super::map_constraint)?;

        Ok(())
    }
}
