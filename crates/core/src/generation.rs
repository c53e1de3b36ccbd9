//! Recipe generation port.
//!
//! Generation is stateless: a request is built from the user's live stock,
//! utensils and preferences, and the generator returns exactly
//! [`CANDIDATE_COUNT`] candidates or fails. Nothing here is persisted.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::inventory::{Ingredient, Utensil};
use crate::preferences::Preferences;
use crate::recipe::GeneratedRecipe;

/// Candidates returned per request.
pub const CANDIDATE_COUNT: usize = 2;

/// Everything the generator may use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub ingredients: Vec<String>,
    pub utensils: Vec<String>,
    pub preferences: Preferences,
}

impl GenerationRequest {
    /// Build a request from live inventory.
    ///
    /// Ingredients with zero stock are left out. Missing preferences fall
    /// back to the defaults.
    #[must_use]
    pub fn from_inventory(
        ingredients: &[Ingredient],
        utensils: &[Utensil],
        preferences: Option<Preferences>,
    ) -> Self {
        Self {
            ingredients: ingredients
                .iter()
                .filter(|i| !i.quantity.is_zero())
                .map(|i| i.name.clone())
                .collect(),
            utensils: utensils.iter().map(|u| u.name.clone()).collect(),
            preferences: preferences.unwrap_or_default(),
        }
    }
}

/// Why generation failed. Callers treat every variant the same way.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("recipe generation is not configured")]
    NotConfigured,

    #[error("no ingredients to cook with")]
    NoIngredients,

    #[error("generator request failed: {0}")]
    Provider(String),

    #[error("generator returned unusable output: {0}")]
    InvalidOutput(String),
}

/// Produces recipe candidates.
#[async_trait]
pub trait RecipeGenerator: Send + Sync {
    /// Generate candidates for a request.
    ///
    /// Implementations return raw candidates; [`validate_candidates`] is
    /// applied by the caller.
    async fn generate(&self, request: &GenerationRequest)
    -> Result<Vec<GeneratedRecipe>, GenerationError>;
}

/// Check generator output against the request.
///
/// # Errors
///
/// Returns [`GenerationError::InvalidOutput`] unless there are exactly
/// [`CANDIDATE_COUNT`] candidates with distinct titles that use only the
/// supplied ingredient names.
pub fn validate_candidates(
    request: &GenerationRequest,
    candidates: Vec<GeneratedRecipe>,
) -> Result<Vec<GeneratedRecipe>, GenerationError> {
    if candidates.len() != CANDIDATE_COUNT {
        return Err(GenerationError::InvalidOutput(format!(
            "expected {CANDIDATE_COUNT} recipes, got {}",
            candidates.len()
        )));
    }

    for candidate in &candidates {
        if candidate.ingredients.is_empty() {
            return Err(GenerationError::InvalidOutput(format!(
                "{} has no ingredients",
                candidate.title
            )));
        }
        if let Some(unknown) = candidate
            .ingredients
            .iter()
            .find(|item| !request.ingredients.contains(&item.name))
        {
            return Err(GenerationError::InvalidOutput(format!(
                "{} uses unavailable ingredient {}",
                candidate.title, unknown.name
            )));
        }
    }

    let mut titles: Vec<String> = candidates
        .iter()
        .map(|c| c.title.trim().to_lowercase())
        .collect();
    titles.sort_unstable();
    titles.dedup();
    if titles.len() != candidates.len() {
        return Err(GenerationError::InvalidOutput(
            "recipes must have distinct titles".to_owned(),
        ));
    }

    Ok(candidates)
}
