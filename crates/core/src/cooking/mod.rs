//! Cooking a saved recipe against live stock.
//!
//! Cooking is all-or-nothing. Every requirement is checked against stock
//! first; only when none falls short are the amounts subtracted and the
//! recipe marked used. Stores run [`plan`] (or an equivalent database
//! function) while holding locks on the recipe and the matched rows, so no
//! partial state is ever visible.

pub mod wire;

use serde::{Deserialize, Serialize};

use crate::recipe::RecipeIngredient;
use crate::store::StoreError;
use crate::types::{Quantity, RecipeId};

/// One ingredient the recipe needs more of than is stocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub name: String,
    /// Total amount the recipe requires.
    pub required: Quantity,
    /// Amount in stock, or `None` when the ingredient is not stocked at all.
    #[serde(default)]
    pub available: Option<Quantity>,
}

impl Shortfall {
    /// Human-readable description.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.available {
            Some(available) => format!(
                "Not enough {}: need {}, have {}",
                self.name, self.required, available
            ),
            None => format!("{} is not in your pantry", self.name),
        }
    }
}

/// A single subtraction the store must apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deduction {
    pub name: String,
    pub required: Quantity,
    /// Stock left after subtracting `required`.
    pub remaining: Quantity,
}

/// The checked result of cooking: one deduction per distinct ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CookPlan {
    pub deductions: Vec<Deduction>,
}

/// What a successful cook consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookReceipt {
    pub recipe_id: RecipeId,
    pub consumed: Vec<RecipeIngredient>,
}

/// Why a cook did not happen.
#[derive(thiserror::Error, Debug)]
pub enum CookError {
    #[error("recipe not found")]
    NotFound,

    #[error("recipe has already been cooked")]
    AlreadyUsed,

    #[error("{}", primary_message(.0))]
    Insufficient(Vec<Shortfall>),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CookError {
    /// Whether repeating the call might succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Store(err) if err.is_transient())
    }
}

fn primary_message(shortfalls: &[Shortfall]) -> String {
    shortfalls
        .first()
        .map_or_else(|| "insufficient ingredients".to_owned(), Shortfall::describe)
}

/// Outcome reported by a store's cook operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookReply {
    Cooked,
    NotFound,
    AlreadyUsed,
    Insufficient(Vec<Shortfall>),
}

impl CookReply {
    /// Convert a non-success reply into its [`CookError`].
    ///
    /// # Errors
    ///
    /// Every variant except [`CookReply::Cooked`].
    pub fn into_result(self) -> Result<(), CookError> {
        match self {
            Self::Cooked => Ok(()),
            Self::NotFound => Err(CookError::NotFound),
            Self::AlreadyUsed => Err(CookError::AlreadyUsed),
            Self::Insufficient(shortfalls) => Err(CookError::Insufficient(shortfalls)),
        }
    }
}

/// Sum repeated names, keeping first-appearance order.
///
/// Matching is exact and case-sensitive: `"Flour"` and `"flour"` are two
/// different requirements.
#[must_use]
pub fn aggregate_requirements(ingredients: &[RecipeIngredient]) -> Vec<RecipeIngredient> {
    let mut totals: Vec<RecipeIngredient> = Vec::with_capacity(ingredients.len());
    for item in ingredients {
        match totals.iter_mut().find(|total| total.name == item.name) {
            Some(total) => total.quantity = total.quantity.saturating_add(item.quantity),
            None => totals.push(item.clone()),
        }
    }
    totals
}

/// Check a recipe's requirements against stock.
///
/// `stock` returns the current amount of a same-named ingredient, or `None`
/// when it is not stocked. All shortfalls are collected, in recipe order.
///
/// # Errors
///
/// Returns every [`Shortfall`] when at least one requirement is not covered.
pub fn plan<F>(requirements: &[RecipeIngredient], stock: F) -> Result<CookPlan, Vec<Shortfall>>
where
    F: Fn(&str) -> Option<Quantity>,
{
    let mut deductions = Vec::new();
    let mut shortfalls = Vec::new();

    for requirement in aggregate_requirements(requirements) {
        let available = stock(&requirement.name);
        match available.and_then(|have| have.checked_sub(requirement.quantity)) {
            Some(remaining) => deductions.push(Deduction {
                name: requirement.name,
                required: requirement.quantity,
                remaining,
            }),
            None => shortfalls.push(Shortfall {
                name: requirement.name,
                required: requirement.quantity,
                available,
            }),
        }
    }

    if shortfalls.is_empty() {
        Ok(CookPlan { deductions })
    } else {
        Err(shortfalls)
    }
}
