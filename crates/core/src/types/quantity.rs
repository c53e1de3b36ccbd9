//! Non-negative decimal amounts for stock and recipe requirements.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// The input is not a decimal number.
    #[error("quantity must be a number")]
    NotANumber,
    /// The amount is below zero.
    #[error("quantity cannot be negative")]
    Negative,
    /// The amount is zero where a positive amount is required.
    #[error("quantity must be greater than zero")]
    NotPositive,
}

/// A non-negative decimal amount.
///
/// Inventory rows hold a `Quantity` that may reach zero after cooking. Input
/// paths (adding stock, recipe requirements) go through
/// [`Quantity::parse_positive`] or [`Quantity::positive`], which also reject
/// zero.
///
/// Serialized as a decimal string (`"12.5"`) so no precision is lost in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Quantity(Decimal);

impl Quantity {
    /// The empty amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// A single unit.
    pub const ONE: Self = Self(Decimal::ONE);

    /// The largest representable amount.
    pub const MAX: Self = Self(Decimal::MAX);

    /// Wrap a decimal, rejecting negative values.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Negative`] for amounts below zero.
    pub fn new(amount: Decimal) -> Result<Self, QuantityError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(QuantityError::Negative);
        }
        Ok(Self(amount.normalize()))
    }

    /// Wrap a decimal, rejecting zero and negative values.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::NotPositive`] or [`QuantityError::Negative`].
    pub fn positive(amount: Decimal) -> Result<Self, QuantityError> {
        let quantity = Self::new(amount)?;
        if quantity.is_zero() {
            return Err(QuantityError::NotPositive);
        }
        Ok(quantity)
    }

    /// Parse user input such as `" 2.5 "` into a strictly positive amount.
    ///
    /// # Errors
    ///
    /// Returns a [`QuantityError`] when the text is not a positive number.
    pub fn parse_positive(input: &str) -> Result<Self, QuantityError> {
        let amount = Decimal::from_str(input.trim()).map_err(|_| QuantityError::NotANumber)?;
        Self::positive(amount)
    }

    /// Returns the underlying decimal.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Subtract `other`, returning `None` if the result would go below zero.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        if other.0 > self.0 {
            return None;
        }
        Some(Self((self.0 - other.0).normalize()))
    }

    /// Add two amounts, returning `None` on decimal overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(|sum| Self(sum.normalize()))
    }

    /// Add two amounts, capping at [`Quantity::MAX`].
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        self.checked_add(other).unwrap_or(Self::MAX)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| QuantityError::NotANumber)?;
        Self::new(amount)
    }
}

impl TryFrom<Decimal> for Quantity {
    type Error = QuantityError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Quantity> for Decimal {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Quantity {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Quantity {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Quantity {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
