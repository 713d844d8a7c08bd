//! Marketplace Core - Shared domain types.
//!
//! This crate provides the types used by every marketplace component:
//! - `console` - Interactive console and operator subcommands
//! - `integration-tests` - End-to-end scenarios against `PostgreSQL`
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O and no
//! database access. The optional `postgres` feature adds `sqlx` encoding for
//! the ID and role types.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, roles, coordinates and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
