//! Integration tests for the marketplace console.
//!
//! # Running Tests
//!
//! ```bash
//! export MARKETPLACE_TEST_DATABASE_URL=postgres://localhost:5432/marketplace_test
//! cargo test -p marketplace-integration-tests
//! ```
//!
//! Database-backed tests return early when `MARKETPLACE_TEST_DATABASE_URL` is
//! unset. Migrations are applied on first connect. Every test creates its own
//! users and stores under unique names, so tests can share one database and
//! run in parallel.
//!
//! # Test Categories
//!
//! - `accounts` - Create user and log in
//! - `browse` - Nearby stores and product listings
//! - `orders` - Order placement and history
//! - `manager` - Product edits, supply requests and reports
//! - `executor` - Text SQL executor
//! - `seed` - Transactional seeding

#![allow(clippy::missing_panics_doc, clippy::expect_used, clippy::print_stderr)]

use std::io::Cursor;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use marketplace_console::console::Console;
use marketplace_console::db::{self, ProductRepository, RepositoryError, StoreRepository, UserRepository};
use marketplace_console::models::{NewUser, Product, Store};
use marketplace_core::{Coordinates, Price, Role, StoreId, UserId};

/// Environment variable holding the test database URL.
pub const DATABASE_URL_VAR: &str = "MARKETPLACE_TEST_DATABASE_URL";

/// Console fed from a script, capturing both writers.
pub type ScriptedConsole = Console<Cursor<Vec<u8>>, Vec<u8>, Vec<u8>>;

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Connect to the test database and apply migrations.
///
/// Returns `None` when `MARKETPLACE_TEST_DATABASE_URL` is unset.
pub async fn test_pool() -> Option<PgPool> {
    let Ok(url) = std::env::var(DATABASE_URL_VAR) else {
        eprintln!("{DATABASE_URL_VAR} not set, skipping");
        return None;
    };
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    Some(pool)
}

/// A console that reads `input` line by line.
#[must_use]
pub fn scripted(input: &str) -> ScriptedConsole {
    Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), Vec::new())
}

/// Everything written to the output and error streams.
#[must_use]
pub fn output(console: ScriptedConsole) -> (String, String) {
    let (_, out, err) = console.into_parts();
    (
        String::from_utf8(out).expect("output is UTF-8"),
        String::from_utf8(err).expect("error output is UTF-8"),
    )
}

/// A name no other test run has used.
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{nanos}-{n}")
}

/// Insert a user with a role and return its ID.
pub async fn create_user(pool: &PgPool, name: &str, password: &str, at: Coordinates, role: Role) -> UserId {
    let user = NewUser {
        name: name.to_owned(),
        password: password.to_owned(),
        coordinates: at,
    };
    UserRepository::new(pool)
        .create_with_role(&user, role)
        .await
        .expect("Failed to create user")
}

/// Insert a store at the next free ID.
///
/// Store IDs are not serial; concurrent tests may race for the same ID, so
/// a conflicting insert is retried with a fresh one.
pub async fn create_store(pool: &PgPool, manager: UserId, at: Coordinates) -> StoreId {
    let stores = StoreRepository::new(pool);
    for _ in 0..10 {
        let (next,): (i32,) = sqlx::query_as("SELECT COALESCE(MAX(storeID), 0) + 1 FROM Store")
            .fetch_one(pool)
            .await
            .expect("Failed to read store IDs");
        let store = Store {
            id: StoreId::new(next),
            name: unique_name("store"),
            coordinates: at,
            manager_id: manager,
        };
        match stores.insert(&store).await {
            Ok(()) => return store.id,
            Err(RepositoryError::Conflict(_)) => {}
            Err(e) => panic!("Failed to create store: {e}"),
        }
    }
    panic!("No free store ID after 10 attempts");
}

/// Stock a product.
pub async fn add_product(pool: &PgPool, store: StoreId, name: &str, units: i32, price: &str) {
    let product = Product {
        store_id: store,
        name: name.to_owned(),
        units,
        price: Price::parse(price).expect("valid price"),
    };
    ProductRepository::new(pool)
        .insert(&product)
        .await
        .expect("Failed to add product");
}

/// Current stock of a product.
pub async fn units(pool: &PgPool, store: StoreId, name: &str) -> Option<i32> {
    ProductRepository::new(pool)
        .units(store, name)
        .await
        .expect("Failed to read units")
}

/// Orders recorded for a customer.
pub async fn order_count(pool: &PgPool, customer: UserId) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM Orders WHERE customerID = $1")
        .bind(customer)
        .fetch_one(pool)
        .await
        .expect("Failed to count orders");
    count
}
