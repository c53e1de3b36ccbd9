//! Recipe generation, saving and removal.

use serde::Serialize;
use tracing::instrument;

use pantry_core::generation::validate_candidates;
use pantry_core::store::{InventoryStore, PreferenceStore, ProfileStore, RecipeStore};
use pantry_core::{
    GeneratedRecipe, GenerationError, GenerationRequest, NewRecipe, Recipe, RecipeGenerator,
    RecipeId, UserId,
};

use super::OnboardingService;
use crate::error::{AppError, Result};

/// A stored recipe and whether saving it finished onboarding.
#[derive(Debug, Clone, Serialize)]
pub struct SavedRecipe {
    pub recipe: Recipe,
    pub onboarding_completed: bool,
}

pub struct RecipeService<'a, S: ?Sized, G: ?Sized> {
    store: &'a S,
    generator: &'a G,
}

impl<'a, S, G> RecipeService<'a, S, G>
where
    S: InventoryStore + PreferenceStore + ProfileStore + RecipeStore + ?Sized,
    G: RecipeGenerator + ?Sized,
{
    #[must_use]
    pub const fn new(store: &'a S, generator: &'a G) -> Self {
        Self { store, generator }
    }

    /// Generate two candidates from live stock, utensils and preferences.
    ///
    /// Nothing is stored. Failures are not retried.
    ///
    /// # Errors
    ///
    /// Returns `generation_failed` for any generator failure, including an
    /// empty pantry, or the store error from reading inventory.
    #[instrument(skip(self), fields(user_id = %user))]
    pub async fn generate(&self, user: UserId) -> Result<Vec<GeneratedRecipe>> {
        let ingredients = self.store.list_ingredients(user).await?;
        let utensils = self.store.list_utensils(user).await?;
        let preferences = self.store.get_preferences(user).await?;

        let request = GenerationRequest::from_inventory(&ingredients, &utensils, preferences);
        if request.ingredients.is_empty() {
            return Err(GenerationError::NoIngredients.into());
        }

        let candidates = self
            .generator
            .generate(&request)
            .await
            .and_then(|candidates| validate_candidates(&request, candidates))
            .inspect_err(|e| tracing::warn!(error = %e, "Recipe generation failed"))?;

        tracing::info!(count = candidates.len(), "Recipes generated");
        Ok(candidates)
    }

    /// Store a generated candidate.
    ///
    /// Onboarding is latched only when the earlier setup steps are done;
    /// a recipe saved before that does not skip them.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unusable candidate, or the store
    /// error from inserting it.
    #[instrument(skip(self, candidate), fields(user_id = %user, title = %candidate.title))]
    pub async fn save(&self, user: UserId, candidate: &GeneratedRecipe) -> Result<SavedRecipe> {
        let recipe = NewRecipe::from_generated(candidate)?;
        let recipe = self.store.create_recipe(user, &recipe).await?;

        // The recipe is stored either way; a missed latch is repaired by the
        // next onboarding check.
        let onboarding_completed = match OnboardingService::new(self.store)
            .complete_if_ready(user)
            .await
        {
            Ok(changed) => changed,
            Err(e) => {
                tracing::error!(error = %e, "Failed to latch onboarding after save");
                false
            }
        };
        if onboarding_completed {
            tracing::info!("Onboarding completed by first saved recipe");
        }

        Ok(SavedRecipe {
            recipe,
            onboarding_completed,
        })
    }

    /// Newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn list(&self, user: UserId) -> Result<Vec<Recipe>> {
        Ok(self.store.list_recipes(user).await?)
    }

    /// # Errors
    ///
    /// Returns `not_found` for missing or foreign recipes.
    pub async fn get(&self, user: UserId, id: RecipeId) -> Result<Recipe> {
        Ok(self.store.get_recipe(user, id).await?)
    }

    /// # Errors
    ///
    /// Returns `confirmation_required` unless `confirmed`, otherwise
    /// `not_found` or the store error.
    #[instrument(skip(self), fields(user_id = %user, recipe_id = %id))]
    pub async fn remove(&self, user: UserId, id: RecipeId, confirmed: bool) -> Result<()> {
        if !confirmed {
            return Err(AppError::ConfirmationRequired("recipe"));
        }
        self.store.delete_recipe(user, id).await?;
        tracing::info!("Recipe deleted");
        Ok(())
    }
}
