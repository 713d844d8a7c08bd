//! Order domain types and the stock rules applied before an order is written.

use chrono::NaiveDateTime;
use marketplace_core::{OrderNumber, StoreId};
use thiserror::Error;

/// One of a customer's past orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub order_number: OrderNumber,
    pub store_id: StoreId,
    pub product_name: String,
    pub units_ordered: i32,
    pub order_time: NaiveDateTime,
}

/// Why an order was not placed. Shown to the customer as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderRejection {
    #[error("Store {0} not found.")]
    StoreNotFound(StoreId),
    #[error("Store {store_id} is too far from the current location ({distance:.2} units away).")]
    TooFar { store_id: StoreId, distance: f64 },
    #[error("Product {product} not found at Store {store_id}.")]
    ProductNotFound { store_id: StoreId, product: String },
    #[error("Product {product} out of stock at Store {store_id}.")]
    OutOfStock { store_id: StoreId, product: String },
    #[error("Units to purchase must be at least 1.")]
    NonPositiveQuantity,
    #[error("Not enough units available.")]
    InsufficientUnits { available: i32, requested: i32 },
}

/// Check that a product exists and has stock; returns the available units.
///
/// # Errors
///
/// `ProductNotFound` when `available` is `None`, `OutOfStock` when it is zero
/// or below.
pub fn check_stock(
    store_id: StoreId,
    product: &str,
    available: Option<i32>,
) -> Result<i32, OrderRejection> {
    match available {
        None => Err(OrderRejection::ProductNotFound {
            store_id,
            product: product.to_owned(),
        }),
        Some(units) if units <= 0 => Err(OrderRejection::OutOfStock {
            store_id,
            product: product.to_owned(),
        }),
        Some(units) => Ok(units),
    }
}

/// Check a requested quantity against the available units.
///
/// # Errors
///
/// `NonPositiveQuantity` for zero or negative requests, `InsufficientUnits`
/// when more is requested than is available.
pub const fn check_quantity(available: i32, requested: i32) -> Result<(), OrderRejection> {
    if requested <= 0 {
        return Err(OrderRejection::NonPositiveQuantity);
    }
    if requested > available {
        return Err(OrderRejection::InsufficientUnits {
            available,
            requested,
        });
    }
    Ok(())
}
