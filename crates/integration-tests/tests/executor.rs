//! Integration tests for the text SQL executor.
//!
//! Requires `MARKETPLACE_TEST_DATABASE_URL`; each test returns early without it.

#![allow(clippy::unwrap_used)]

use marketplace_console::db::{Executor, RepositoryError};
use marketplace_core::{Coordinates, Role};
use marketplace_integration_tests::{add_product, create_store, create_user, test_pool, unique_name};

#[tokio::test]
async fn test_query_and_return_empty_result() {
    let Some(pool) = test_pool().await else { return };
    let executor = Executor::new(pool);

    let rows = executor
        .query_and_return(sqlx::query("SELECT userID, name FROM Users WHERE userID = $1").bind(-1))
        .await
        .unwrap();

    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_query_and_return_renders_text() {
    let Some(pool) = test_pool().await else { return };
    let manager = create_user(&pool, &unique_name("carol"), "pw2", Coordinates::new(0.0, 0.0), Role::Manager).await;
    let store = create_store(&pool, manager, Coordinates::new(1.0, 2.5)).await;
    add_product(&pool, store, "Widget", 5, "3.00").await;
    let executor = Executor::new(pool);

    let rows = executor
        .query_and_return(
            sqlx::query(
                "SELECT p.productName, p.numberOfUnits, p.pricePerUnit, s.longitude, NULL::text AS note
                 FROM Product p JOIN Store s ON s.storeID = p.storeID
                 WHERE p.storeID = $1",
            )
            .bind(store),
        )
        .await
        .unwrap();

    assert_eq!(
        rows,
        vec![vec![
            Some("Widget".to_owned()),
            Some("5".to_owned()),
            Some("3.00".to_owned()),
            Some("2.5".to_owned()),
            None,
        ]]
    );
}

#[tokio::test]
async fn test_query_and_print_writes_header_and_rows() {
    let Some(pool) = test_pool().await else { return };
    let manager = create_user(&pool, &unique_name("carol"), "pw2", Coordinates::new(0.0, 0.0), Role::Manager).await;
    let store = create_store(&pool, manager, Coordinates::new(1.0, 2.0)).await;
    add_product(&pool, store, "Lamp", 8, "24.99").await;
    add_product(&pool, store, "Widget", 5, "3.00").await;
    let executor = Executor::new(pool);

    let mut out = Vec::new();
    let printed = executor
        .query_and_print(
            sqlx::query(
                "SELECT productName, numberOfUnits FROM Product WHERE storeID = $1 ORDER BY productName",
            )
            .bind(store),
            &mut out,
        )
        .await
        .unwrap();

    assert_eq!(printed, 2);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "productname\tnumberofunits\nLamp\t8\nWidget\t5\n"
    );
}

#[tokio::test]
async fn test_execute_update_counts_rows() {
    let Some(pool) = test_pool().await else { return };
    let manager = create_user(&pool, &unique_name("carol"), "pw2", Coordinates::new(0.0, 0.0), Role::Manager).await;
    let store = create_store(&pool, manager, Coordinates::new(1.0, 2.0)).await;
    add_product(&pool, store, "Lamp", 8, "24.99").await;
    add_product(&pool, store, "Widget", 5, "3.00").await;
    let executor = Executor::new(pool);

    let affected = executor
        .execute_update(
            sqlx::query("UPDATE Product SET numberOfUnits = numberOfUnits + 1 WHERE storeID = $1").bind(store),
        )
        .await
        .unwrap();

    assert_eq!(affected, 2);
}

#[tokio::test]
async fn test_unsupported_column_type() {
    let Some(pool) = test_pool().await else { return };
    let executor = Executor::new(pool);

    let err = executor
        .query_and_return(sqlx::query("SELECT '{1,2}'::int4[] AS ids"))
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::UnsupportedColumn { .. }));
}

#[tokio::test]
async fn test_char_columns_render_as_text() {
    let Some(pool) = test_pool().await else { return };
    let executor = Executor::new(pool);

    let rows = executor
        .query_and_return(sqlx::query(r#"SELECT 'r'::"char" AS kind, 'ab'::char(3) AS code"#))
        .await
        .unwrap();

    assert_eq!(rows, vec![vec![Some("r".to_owned()), Some("ab ".to_owned())]]);
}

