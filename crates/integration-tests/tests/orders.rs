//! Integration tests for order placement and order history.
//!
//! Requires `MARKETPLACE_TEST_DATABASE_URL`; each test returns early without it.

#![allow(clippy::unwrap_used)]

use marketplace_console::db::{OrderRepository, RepositoryError};
use marketplace_console::handlers::{Handlers, Refusal};
use marketplace_console::models::{OrderRejection, User};
use marketplace_core::{Coordinates, Role, StoreId, UserId};
use marketplace_integration_tests::{
    add_product, create_store, create_user, order_count, output, scripted, test_pool, unique_name,
    units,
};
use sqlx::PgPool;

/// A customer at (10, 10) and a store four and a half units away selling
/// five widgets and no sprockets.
async fn shop(pool: &PgPool) -> (User, StoreId) {
    let manager = create_user(pool, &unique_name("carol"), "pw2", Coordinates::new(40.0, 40.0), Role::Manager).await;
    let store = create_store(pool, manager, Coordinates::new(12.0, 14.0)).await;
    add_product(pool, store, "Widget", 5, "3.00").await;
    add_product(pool, store, "Sprocket", 0, "1.25").await;

    let name = unique_name("alice");
    let id = create_user(pool, &name, "pw1", Coordinates::new(10.0, 10.0), Role::Customer).await;
    let alice = User {
        id,
        name,
        coordinates: Coordinates::new(10.0, 10.0),
        role: Role::Customer,
    };
    (alice, store)
}

#[tokio::test]
async fn test_order_is_recorded_and_stock_decremented() {
    let Some(pool) = test_pool().await else { return };
    let (alice, store) = shop(&pool).await;

    let mut console = scripted(&format!("{store}\nWidget\n3\n"));
    let number = Handlers::new(&pool, &mut console)
        .place_order(&alice)
        .await
        .unwrap()
        .done()
        .expect("order placed");

    let (out, _) = output(console);
    assert!(out.contains("Units available: 5"));
    assert!(out.ends_with(&format!("Order placed! Order number: {number}\n")));

    let (customer, ordered_store, product, units_ordered): (i32, i32, String, i32) = sqlx::query_as(
        "SELECT customerID, storeID, productName, unitsOrdered FROM Orders WHERE orderNumber = $1",
    )
    .bind(number)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(customer, alice.id.as_i32());
    assert_eq!(ordered_store, store.as_i32());
    assert_eq!(product, "Widget");
    assert_eq!(units_ordered, 3);

    assert_eq!(order_count(&pool, alice.id).await, 1);
    assert_eq!(units(&pool, store, "Widget").await, Some(2));
}

#[tokio::test]
async fn test_more_than_available_is_rejected() {
    let Some(pool) = test_pool().await else { return };
    let (alice, store) = shop(&pool).await;

    let mut console = scripted(&format!("{store}\nWidget\n6\n"));
    let outcome = Handlers::new(&pool, &mut console).place_order(&alice).await.unwrap();

    assert_eq!(
        outcome.refusal(),
        Some(&Refusal::Order(OrderRejection::InsufficientUnits {
            available: 5,
            requested: 6
        }))
    );
    assert_eq!(order_count(&pool, alice.id).await, 0);
    assert_eq!(units(&pool, store, "Widget").await, Some(5));
}

#[tokio::test]
async fn test_non_positive_quantity_is_rejected() {
    let Some(pool) = test_pool().await else { return };
    let (alice, store) = shop(&pool).await;

    let mut console = scripted(&format!("{store}\nWidget\n0\n"));
    let outcome = Handlers::new(&pool, &mut console).place_order(&alice).await.unwrap();

    assert_eq!(
        outcome.refusal(),
        Some(&Refusal::Order(OrderRejection::NonPositiveQuantity))
    );
    assert_eq!(order_count(&pool, alice.id).await, 0);
}

#[tokio::test]
async fn test_absent_and_empty_products_are_rejected() {
    let Some(pool) = test_pool().await else { return };
    let (alice, store) = shop(&pool).await;

    let mut console = scripted(&format!("{store}\nGizmo\n"));
    let outcome = Handlers::new(&pool, &mut console).place_order(&alice).await.unwrap();
    assert!(matches!(
        outcome.refusal(),
        Some(Refusal::Order(OrderRejection::ProductNotFound { .. }))
    ));
    let (out, _) = output(console);
    assert!(out.contains("Product Gizmo not found"));

    let mut console = scripted(&format!("{store}\nSprocket\n"));
    let outcome = Handlers::new(&pool, &mut console).place_order(&alice).await.unwrap();
    assert!(matches!(
        outcome.refusal(),
        Some(Refusal::Order(OrderRejection::OutOfStock { .. }))
    ));

    assert_eq!(order_count(&pool, alice.id).await, 0);
}

#[tokio::test]
async fn test_far_store_is_rejected() {
    let Some(pool) = test_pool().await else { return };
    let (alice, _) = shop(&pool).await;
    let manager = create_user(&pool, &unique_name("dave"), "pw4", Coordinates::new(0.0, 0.0), Role::Manager).await;
    // (28, 34) is exactly 30 away from (10, 10).
    let far = create_store(&pool, manager, Coordinates::new(28.0, 34.0)).await;
    add_product(&pool, far, "Widget", 5, "3.00").await;

    let mut console = scripted(&format!("{far}\nWidget\n1\n"));
    let outcome = Handlers::new(&pool, &mut console).place_order(&alice).await.unwrap();

    assert!(matches!(
        outcome.refusal(),
        Some(Refusal::Order(OrderRejection::TooFar { .. }))
    ));
    assert_eq!(order_count(&pool, alice.id).await, 0);
}

#[tokio::test]
async fn test_recent_orders_newest_first() {
    let Some(pool) = test_pool().await else { return };
    let (alice, store) = shop(&pool).await;

    for quantity in ["1", "2"] {
        let mut console = scripted(&format!("{store}\nWidget\n{quantity}\n"));
        Handlers::new(&pool, &mut console)
            .place_order(&alice)
            .await
            .unwrap()
            .done()
            .expect("order placed");
    }

    let mut console = scripted("");
    let orders = Handlers::new(&pool, &mut console)
        .view_recent_orders(&alice)
        .await
        .unwrap();

    let quantities: Vec<i32> = orders.iter().map(|o| o.units_ordered).collect();
    assert_eq!(quantities, vec![2, 1]);
    assert_eq!(units(&pool, store, "Widget").await, Some(2));
}

#[tokio::test]
async fn test_guarded_decrement_refuses_oversell() {
    let Some(pool) = test_pool().await else { return };
    let (alice, store) = shop(&pool).await;

    let err = OrderRepository::new(&pool)
        .place(alice.id, store, "Widget", 6)
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::InsufficientStock { available: 5 }));
    assert_eq!(units(&pool, store, "Widget").await, Some(5));
    assert_eq!(order_count(&pool, alice.id).await, 0);
}

#[tokio::test]
async fn test_failed_order_insert_rolls_back_decrement() {
    let Some(pool) = test_pool().await else { return };
    let (_, store) = shop(&pool).await;

    let err = OrderRepository::new(&pool)
        .place(UserId::new(-1), store, "Widget", 2)
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::Conflict(_)));
    assert_eq!(units(&pool, store, "Widget").await, Some(5));
    let (orders,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM Orders WHERE storeID = $1")
        .bind(store)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(orders, 0);
}

