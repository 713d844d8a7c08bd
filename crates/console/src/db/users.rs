//! User repository.
//!
//! Passwords are stored and compared as plain text.

use sqlx::{PgExecutor, PgPool};
use tracing::{debug, instrument};

use marketplace_core::{Coordinates, Role, UserId};

use super::{RepositoryError, map_constraint};
use crate::models::{NewUser, User};

/// Internal row type for user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    user_id: i32,
    name: String,
    latitude: f64,
    longitude: f64,
    role: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.user_id),
            name: row.name,
            coordinates: Coordinates::new(row.latitude, row.longitude),
            role: Role::from_column(&row.role),
        }
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a customer account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a constraint violation and
    /// `RepositoryError::Database` for other database errors.
    pub async fn create(&self, user: &NewUser) -> Result<UserId, RepositoryError> {
        self.create_with_role(user, Role::Customer).await
    }

    /// Create an account with an explicit role (used when seeding managers).
    ///
    /// # Errors
    ///
    /// Same as [`UserRepository::create`].
    pub async fn create_with_role(
        &self,
        user: &NewUser,
        role: Role,
    ) -> Result<UserId, RepositoryError> {
        Self::insert_with_role(self.pool, user, role).await
    }

    /// Insert an account through `executor`, a pool or an open transaction.
    ///
    /// # Errors
    ///
    /// Same as [`UserRepository::create`].
    #[instrument(skip(executor, user), fields(name = %user.name))]
    pub async fn insert_with_role<'e>(
        executor: impl PgExecutor<'e>,
        user: &NewUser,
        role: Role,
    ) -> Result<UserId, RepositoryError> {
        let (id,): (i32,) = sqlx::query_as(
            r"
            INSERT INTO Users (name, password, latitude, longitude, type)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING userID
            ",
        )
        .bind(&user.name)
        .bind(&user.password)
        .bind(user.coordinates.latitude)
        .bind(user.coordinates.longitude)
        .bind(role)
        .fetch_one(executor)
        .await
        .map_err(map_constraint)?;

        debug!(user_id = id, %role, "Created user");
        Ok(UserId::new(id))
    }

    /// Find the first user whose name and password match exactly.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self, password))]
    pub async fn authenticate(
        &self,
        name: &str,
        password: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT userID AS user_id,
                   TRIM(name) AS name,
                   latitude::float8 AS latitude,
                   longitude::float8 AS longitude,
                   TRIM(type) AS role
            FROM Users
            WHERE name = $1 AND password = $2
            ORDER BY userID
            LIMIT 1
            ",
        )
        .bind(name)
        .bind(password)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    /// Current coordinates of a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn coordinates(&self, id: UserId) -> Result<Option<Coordinates>, RepositoryError> {
        let row: Option<(f64, f64)> = sqlx::query_as(
            r"
            SELECT latitude::float8, longitude::float8
            FROM Users
            WHERE userID = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(latitude, longitude)| Coordinates::new(latitude, longitude)))
    }
}
