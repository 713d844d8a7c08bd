//! Price per unit using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("price must be a number: {0}")]
    Invalid(String),
    /// The input is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative unit price, in dollars.
///
/// ## Examples
///
/// ```
/// use marketplace_core::Price;
///
/// assert_eq!(Price::parse("4.5").unwrap().to_string(), "$4.50");
/// assert!(Price::parse("-1").is_err());
/// assert!(Price::parse("cheap").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Parse a price typed at the console.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Invalid` for non-numeric input and
    /// `PriceError::Negative` for amounts below zero.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let s = s.trim();
        let amount: Decimal = s.parse().map_err(|_| PriceError::Invalid(s.to_owned()))?;
        Self::new(amount)
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl core::str::FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Price::parse("12").unwrap().amount(), Decimal::new(12, 0));
        assert_eq!(Price::parse(" 0.99 ").unwrap().amount(), Decimal::new(99, 2));
        assert!(Price::parse("0").is_ok());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(Price::parse("abc"), Err(PriceError::Invalid(_))));
        assert!(matches!(Price::parse(""), Err(PriceError::Invalid(_))));
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(Price::parse("-0.01"), Err(PriceError::Negative));
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::parse("3").unwrap().to_string(), "$3.00");
        assert_eq!(Price::parse("19.5").unwrap().to_string(), "$19.50");
    }

    #[test]
    fn test_serde_as_string() {
        let price = Price::parse("4.25").unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"4.25\"");
    }

    #[test]
    fn test_deserialize_checks_sign() {
        let price: Price = serde_json::from_str("\"5.00\"").unwrap();
        assert_eq!(price.amount(), Decimal::new(500, 2));

        let err = serde_json::from_str::<Price>("\"-5.00\"").unwrap_err();
        assert!(err.to_string().contains("price cannot be negative"));
    }
}
