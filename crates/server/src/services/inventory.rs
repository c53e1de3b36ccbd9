//! Ingredient and utensil management.
//!
//! Input is validated here before anything reaches the store. Deletes are
//! irreversible and require an explicit confirmation from the caller.

use tracing::instrument;

use pantry_core::inventory::{
    IngredientChanges, IngredientInput, IngredientPatch, UtensilInput,
};
use pantry_core::store::InventoryStore;
use pantry_core::{
    Ingredient, IngredientId, NewIngredient, NewUtensil, UserId, Utensil, UtensilId,
};

use crate::error::{AppError, Result};

pub struct InventoryService<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> InventoryService<'a, S>
where
    S: InventoryStore + ?Sized,
{
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    // =========================================================================
    // Ingredients
    // =========================================================================

    /// Newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn ingredients(&self, user: UserId) -> Result<Vec<Ingredient>> {
        Ok(self.store.list_ingredients(user).await?)
    }

    /// Add a new ingredient. A name collision leaves the existing row as is.
    ///
    /// # Errors
    ///
    /// Returns a validation error, or `duplicate_key` if the name is taken.
    #[instrument(skip(self, input), fields(user_id = %user, name = %input.name))]
    pub async fn add_ingredient(&self, user: UserId, input: &IngredientInput) -> Result<Ingredient> {
        let ingredient = NewIngredient::parse(input)?;
        Ok(self.store.create_ingredient(user, &ingredient).await?)
    }

    /// Add an ingredient or overwrite the stock of the same-named one.
    ///
    /// # Errors
    ///
    /// Returns a validation error or the store error.
    #[instrument(skip(self, input), fields(user_id = %user, name = %input.name))]
    pub async fn put_ingredient(&self, user: UserId, input: &IngredientInput) -> Result<Ingredient> {
        let ingredient = NewIngredient::parse(input)?;
        Ok(self.store.upsert_ingredient(user, &ingredient).await?)
    }

    /// # Errors
    ///
    /// Returns a validation error, `not_found` or `duplicate_key` on rename
    /// collisions.
    #[instrument(skip(self, patch), fields(user_id = %user, ingredient_id = %id))]
    pub async fn edit_ingredient(
        &self,
        user: UserId,
        id: IngredientId,
        patch: &IngredientPatch,
    ) -> Result<Ingredient> {
        let changes = IngredientChanges::parse(patch)?;
        Ok(self.store.update_ingredient(user, id, &changes).await?)
    }

    /// # Errors
    ///
    /// Returns `confirmation_required` unless `confirmed`, otherwise
    /// `not_found` or the store error.
    #[instrument(skip(self), fields(user_id = %user, ingredient_id = %id))]
    pub async fn remove_ingredient(
        &self,
        user: UserId,
        id: IngredientId,
        confirmed: bool,
    ) -> Result<()> {
        if !confirmed {
            return Err(AppError::ConfirmationRequired("ingredient"));
        }
        self.store.delete_ingredient(user, id).await?;
        tracing::info!("Ingredient deleted");
        Ok(())
    }

    // =========================================================================
    // Utensils
    // =========================================================================

    /// Newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn utensils(&self, user: UserId) -> Result<Vec<Utensil>> {
        Ok(self.store.list_utensils(user).await?)
    }

    /// # Errors
    ///
    /// Returns a validation error, or `duplicate_key` if the name is taken.
    #[instrument(skip(self, input), fields(user_id = %user, name = %input.name))]
    pub async fn add_utensil(&self, user: UserId, input: &UtensilInput) -> Result<Utensil> {
        let utensil = NewUtensil::parse(input)?;
        Ok(self.store.create_utensil(user, &utensil).await?)
    }

    /// Add a utensil, or return the existing same-named one.
    ///
    /// # Errors
    ///
    /// Returns a validation error or the store error.
    pub async fn put_utensil(&self, user: UserId, input: &UtensilInput) -> Result<Utensil> {
        let utensil = NewUtensil::parse(input)?;
        Ok(self.store.upsert_utensil(user, &utensil).await?)
    }

    /// # Errors
    ///
    /// Returns a validation error, `not_found` or `duplicate_key`.
    #[instrument(skip(self, input), fields(user_id = %user, utensil_id = %id))]
    pub async fn rename_utensil(
        &self,
        user: UserId,
        id: UtensilId,
        input: &UtensilInput,
    ) -> Result<Utensil> {
        let utensil = NewUtensil::parse(input)?;
        Ok(self.store.rename_utensil(user, id, &utensil).await?)
    }

    /// # Errors
    ///
    /// Returns `confirmation_required` unless `confirmed`, otherwise
    /// `not_found` or the store error.
    #[instrument(skip(self), fields(user_id = %user, utensil_id = %id))]
    pub async fn remove_utensil(&self, user: UserId, id: UtensilId, confirmed: bool) -> Result<()> {
        if !confirmed {
            return Err(AppError::ConfirmationRequired("utensil"));
        }
        self.store.delete_utensil(user, id).await?;
        tracing::info!("Utensil deleted");
        Ok(())
    }
}
