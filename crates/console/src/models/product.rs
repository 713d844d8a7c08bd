//! Product domain types.

use marketplace_core::{Price, StoreId, UserId, WarehouseId};

/// A product stocked by a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub store_id: StoreId,
    pub name: String,
    pub units: i32,
    pub price: Price,
}

/// A manager's overwrite of a product's units and price.
#[derive(Debug, Clone)]
pub struct ProductEdit {
    pub manager_id: UserId,
    pub store_id: StoreId,
    pub product_name: String,
    pub units: i32,
    pub price: Price,
}

/// A request to restock a product from a warehouse.
#[derive(Debug, Clone)]
pub struct NewSupplyRequest {
    pub manager_id: UserId,
    pub warehouse_id: WarehouseId,
    pub store_id: StoreId,
    pub product_name: String,
    pub units: i32,
}
