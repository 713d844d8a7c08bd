//! User domain types.

use marketplace_core::{Coordinates, Role, UserId};

/// A logged-in or looked-up user.
///
/// The password is never carried past authentication.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display and login name.
    pub name: String,
    /// Home location on the grid.
    pub coordinates: Coordinates,
    /// Parsed from the `type` column.
    pub role: Role,
}

/// Input for account creation. New accounts are always customers.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub password: String,
    pub coordinates: Coordinates,
}
