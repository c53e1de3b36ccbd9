//! Ingredients and utensils owned by a user.
//!
//! Both collections are keyed by `(user, name)`. Names are stored exactly as
//! typed (after trimming) and compared case-sensitively, which is also how
//! cooking matches recipe requirements against stock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{IngredientId, Quantity, UserId, UtensilId};
use crate::validation::{ValidationError, required_name};

/// Units offered by clients. Free text is accepted as well.
pub const SUGGESTED_UNITS: &[&str] = &[
    "g", "kg", "ml", "l", "pcs", "tsp", "tbsp", "cup", "pinch", "slice", "can",
];

/// Maximum length of a unit label.
pub const UNIT_MAX_LEN: usize = 20;

/// A stocked ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub user_id: UserId,
    pub name: String,
    pub quantity: Quantity,
    pub unit: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A kitchen utensil. Utensils are never consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utensil {
    pub id: UtensilId,
    pub user_id: UserId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A quantity as submitted by a client: either `"2.5"` or `2.5`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawQuantity {
    Text(String),
    Number(serde_json::Number),
}

impl RawQuantity {
    /// Parse into a strictly positive [`Quantity`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Quantity`] for non-numeric, zero or
    /// negative input.
    pub fn parse_positive(&self, field: &'static str) -> Result<Quantity, ValidationError> {
        let parsed = match self {
            Self::Text(text) => Quantity::parse_positive(text),
            Self::Number(number) => Quantity::parse_positive(&number.to_string()),
        };
        parsed.map_err(|source| ValidationError::Quantity { field, source })
    }
}

/// Ingredient fields as submitted by a client, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientInput {
    pub name: String,
    pub quantity: RawQuantity,
    pub unit: String,
}

/// A validated ingredient ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIngredient {
    pub name: String,
    pub quantity: Quantity,
    pub unit: String,
}

impl NewIngredient {
    /// Validate client input.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, checking name, quantity
    /// and unit in that order.
    pub fn parse(input: &IngredientInput) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required_name("name", &input.name)?,
            quantity: input.quantity.parse_positive("quantity")?,
            unit: parse_unit(&input.unit)?,
        })
    }
}

/// Partial ingredient edit as submitted by a client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngredientPatch {
    pub name: Option<String>,
    pub quantity: Option<RawQuantity>,
    pub unit: Option<String>,
}

/// A validated partial ingredient edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientChanges {
    pub name: Option<String>,
    pub quantity: Option<Quantity>,
    pub unit: Option<String>,
}

impl IngredientChanges {
    /// Validate a partial edit. At least one field must be present.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NoChanges`] for an empty patch, otherwise
    /// the first invalid field.
    pub fn parse(patch: &IngredientPatch) -> Result<Self, ValidationError> {
        if patch.name.is_none() && patch.quantity.is_none() && patch.unit.is_none() {
            return Err(ValidationError::NoChanges);
        }
        Ok(Self {
            name: patch
                .name
                .as_deref()
                .map(|name| required_name("name", name))
                .transpose()?,
            quantity: patch
                .quantity
                .as_ref()
                .map(|q| q.parse_positive("quantity"))
                .transpose()?,
            unit: patch.unit.as_deref().map(parse_unit).transpose()?,
        })
    }

    /// Apply the changes to an existing ingredient in place.
    pub fn apply_to(&self, ingredient: &mut Ingredient) {
        if let Some(name) = &self.name {
            ingredient.name.clone_from(name);
        }
        if let Some(quantity) = self.quantity {
            ingredient.quantity = quantity;
        }
        if let Some(unit) = &self.unit {
            ingredient.unit.clone_from(unit);
        }
    }
}

/// Utensil fields as submitted by a client.
#[derive(Debug, Clone, Deserialize)]
pub struct UtensilInput {
    pub name: String,
}

/// A validated utensil ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUtensil {
    pub name: String,
}

impl NewUtensil {
    /// Validate client input.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for a blank or overlong name.
    pub fn parse(input: &UtensilInput) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required_name("name", &input.name)?,
        })
    }
}

fn parse_unit(raw: &str) -> Result<String, ValidationError> {
    let unit = raw.trim();
    if unit.is_empty() {
        return Err(ValidationError::Required { field: "unit" });
    }
    if unit.chars().count() > UNIT_MAX_LEN {
        return Err(ValidationError::TooLong {
            field: "unit",
            max: UNIT_MAX_LEN,
        });
    }
    Ok(unit.to_owned())
}
