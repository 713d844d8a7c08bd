//! Domain types for the console.
//!
//! These types represent validated domain objects separate from database row
//! types. The pure decision rules (nearness, stock checks, report ordering)
//! live next to the types they operate on.

pub mod order;
pub mod product;
pub mod report;
pub mod store;
pub mod user;

pub use order::{OrderRejection, OrderSummary, check_quantity, check_stock};
pub use product::{NewSupplyRequest, Product, ProductEdit};
pub use report::{PopularCustomer, PopularProduct, ProductUpdate, most_recent};
pub use store::{NearbyStore, Store, nearby_stores};
pub use user::{NewUser, User};
