//! Product price.
//!
//! Prices are stored as `DOUBLE PRECISION` and travel over the wire as plain
//! JSON numbers, so the wrapper holds an `f64`. The only invariant is that
//! the value is a finite number no smaller than zero.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceError {
    /// NaN or infinity.
    #[error("price must be a finite number")]
    NotFinite,
    /// Below zero.
    #[error("price must be greater than or equal to 0")]
    Negative,
}

/// A non-negative, finite product price.
///
/// ```
/// use ecommerce_core::Price;
///
/// assert_eq!(Price::new(9.99).unwrap().as_f64(), 9.99);
/// assert!(Price::new(0.0).is_ok());
/// assert!(Price::new(-1.0).is_err());
/// assert!(Price::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    /// Validate and wrap a price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotFinite`] for NaN or infinities and
    /// [`PriceError::Negative`] for values below zero.
    pub fn new(amount: f64) -> Result<Self, PriceError> {
        if !amount.is_finite() {
            return Err(PriceError::NotFinite);
        }
        if amount < 0.0 {
            return Err(PriceError::Negative);
        }
        // Normalise -0.0 so it serializes as 0.
        Ok(Self(amount + 0.0))
    }

    /// The raw amount.
    #[must_use]
    pub const fn as_f64(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <f64 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <f64 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <f64 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <f64 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative_and_non_finite() {
        assert_eq!(Price::new(-0.01), Err(PriceError::Negative));
        assert_eq!(Price::new(f64::INFINITY), Err(PriceError::NotFinite));
        assert_eq!(Price::new(f64::NAN), Err(PriceError::NotFinite));
    }

    #[test]
    fn test_negative_zero_is_zero() {
        let price = Price::new(-0.0).unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "0.0");
    }

    #[test]
    fn test_deserialize_validates() {
        let price: Price = serde_json::from_str("12.5").unwrap();
        assert!((price.as_f64() - 12.5).abs() < f64::EPSILON);
        assert!(serde_json::from_str::<Price>("-3").is_err());
        assert!(serde_json::from_str::<Price>("\"12\"").is_err());
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::new(3.0).unwrap().to_string(), "3.00");
    }
}
