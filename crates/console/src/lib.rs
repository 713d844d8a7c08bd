//! Marketplace console library.
//!
//! A menu-driven store front over `PostgreSQL`: customers browse nearby stores,
//! list products and place orders; store managers edit inventory, request
//! supply from warehouses and read sales reports.
//!
//! # Architecture
//!
//! - [`config`] - Connection settings from arguments and environment
//! - [`db`] - Connection pool, SQL executor and repositories
//! - [`console`] - Line-oriented input/output
//! - [`handlers`] - One use case per menu action
//! - [`menu`] - Main and session menu loops
//! - [`seed`] - Sample data loading
//! - [`models`] - Domain types and the pure rules applied to them

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod console;
pub mod db;
pub mod handlers;
pub mod menu;
pub mod models;
pub mod seed;
