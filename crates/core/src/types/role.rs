//! User roles.
//!
//! The `Users.type` column is free text. It is parsed into a [`Role`] once,
//! when a row is read, and every permission decision afterwards matches on the
//! enum instead of comparing strings.

use serde::{Deserialize, Serialize};

/// Role of a marketplace user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Browses stores and places orders.
    #[default]
    Customer,
    /// Manages one or more stores: updates products, requests supply, views reports.
    Manager,
}

impl Role {
    /// Parse the stored `type` column.
    ///
    /// Fixed-width `CHAR` columns pad with spaces, so the value is trimmed.
    /// Only the exact text `manager` grants manager access; any other value,
    /// including `admin` from seeded data, is treated as a customer.
    #[must_use]
    pub fn from_column(value: &str) -> Self {
        match value.trim() {
            "manager" => Self::Manager,
            _ => Self::Customer,
        }
    }

    /// Text stored in the `type` column for this role.
    #[must_use]
    pub const fn as_column(&self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Manager => "manager",
        }
    }

    /// Whether this role may mutate products and view store reports.
    #[must_use]
    pub const fn is_manager(&self) -> bool {
        matches!(self, Self::Manager)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_column())
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Role {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::from_column(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Role {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_column(), buf)
    }
}
