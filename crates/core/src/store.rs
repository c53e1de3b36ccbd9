//! Storage ports.
//!
//! Every operation takes the acting [`UserId`] explicitly and only sees rows
//! owned by that user. A row owned by someone else is reported exactly like
//! a missing row.

use async_trait::async_trait;

use crate::account::{Account, NewAccount, Profile};
use crate::cooking::CookReply;
use crate::inventory::{Ingredient, IngredientChanges, NewIngredient, NewUtensil, Utensil};
use crate::onboarding::OnboardingSnapshot;
use crate::preferences::Preferences;
use crate::recipe::{NewRecipe, Recipe};
use crate::types::{Email, IngredientId, RecipeId, UserId, UtensilId};

/// Failure reported by a storage adapter.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write. Carries the conflicting key.
    #[error("{0} already exists")]
    Duplicate(String),

    #[error("not found")]
    NotFound,

    /// Storage could not be reached or timed out. Nothing is assumed applied.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Storage answered with something that breaks an invariant.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Any other storage failure.
    #[error("storage error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Whether the same call might succeed if repeated.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert an account and its profile.
    ///
    /// Fails with [`StoreError::Duplicate`] when the email is taken.
    async fn create_account(&self, account: &NewAccount) -> Result<Account, StoreError>;

    async fn find_account_by_email(&self, email: &Email) -> Result<Option<Account>, StoreError>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, user: UserId) -> Result<Profile, StoreError>;

    /// Set the onboarding latch. Returns `true` only for the call that
    /// changed it from false to true.
    async fn mark_onboarding_complete(&self, user: UserId) -> Result<bool, StoreError>;

    /// Read the latch and the live counts the gate is derived from.
    async fn onboarding_snapshot(&self, user: UserId) -> Result<OnboardingSnapshot, StoreError>;
}

#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Newest first.
    async fn list_ingredients(&self, user: UserId) -> Result<Vec<Ingredient>, StoreError>;

    /// Insert only. A name collision fails with [`StoreError::Duplicate`]
    /// and leaves the existing row untouched.
    async fn create_ingredient(
        &self,
        user: UserId,
        ingredient: &NewIngredient,
    ) -> Result<Ingredient, StoreError>;

    /// Insert, or overwrite quantity and unit of the same-named row.
    async fn upsert_ingredient(
        &self,
        user: UserId,
        ingredient: &NewIngredient,
    ) -> Result<Ingredient, StoreError>;

    async fn update_ingredient(
        &self,
        user: UserId,
        id: IngredientId,
        changes: &IngredientChanges,
    ) -> Result<Ingredient, StoreError>;

    async fn delete_ingredient(&self, user: UserId, id: IngredientId) -> Result<(), StoreError>;

    /// Newest first.
    async fn list_utensils(&self, user: UserId) -> Result<Vec<Utensil>, StoreError>;

    async fn create_utensil(&self, user: UserId, utensil: &NewUtensil) -> Result<Utensil, StoreError>;

    /// Insert, or return the existing same-named row unchanged.
    async fn upsert_utensil(&self, user: UserId, utensil: &NewUtensil) -> Result<Utensil, StoreError>;

    async fn rename_utensil(
        &self,
        user: UserId,
        id: UtensilId,
        utensil: &NewUtensil,
    ) -> Result<Utensil, StoreError>;

    async fn delete_utensil(&self, user: UserId, id: UtensilId) -> Result<(), StoreError>;
}

#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get_preferences(&self, user: UserId) -> Result<Option<Preferences>, StoreError>;

    /// Replace the whole record.
    async fn save_preferences(
        &self,
        user: UserId,
        preferences: &Preferences,
    ) -> Result<Preferences, StoreError>;
}

#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Newest first.
    async fn list_recipes(&self, user: UserId) -> Result<Vec<Recipe>, StoreError>;

    async fn get_recipe(&self, user: UserId, id: RecipeId) -> Result<Recipe, StoreError>;

    async fn create_recipe(&self, user: UserId, recipe: &NewRecipe) -> Result<Recipe, StoreError>;

    async fn delete_recipe(&self, user: UserId, id: RecipeId) -> Result<(), StoreError>;
}

#[async_trait]
pub trait CookingStore: Send + Sync {
    /// Atomically check stock, subtract and mark the recipe used.
    ///
    /// Business outcomes come back as a [`CookReply`]; only storage failures
    /// are errors.
    async fn cook_recipe(&self, user: UserId, recipe: RecipeId) -> Result<CookReply, StoreError>;
}

/// Every port the service needs, behind one object.
#[async_trait]
pub trait PantryStore:
    AccountStore + ProfileStore + InventoryStore + PreferenceStore + RecipeStore + CookingStore
{
    /// Round-trip to storage for readiness checks.
    async fn ping(&self) -> Result<(), StoreError>;
}
