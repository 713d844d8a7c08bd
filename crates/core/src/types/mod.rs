//! Core types for the marketplace.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod geo;
pub mod id;
pub mod price;
pub mod role;

pub use geo::{Coordinates, NEARBY_RADIUS};
pub use id::*;
pub use price::Price;
pub use role::Role;
