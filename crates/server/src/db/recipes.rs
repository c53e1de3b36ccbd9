//! Saved recipe repository.
//!
//! The ingredient list is stored as a JSONB snapshot; the cook function reads
//! it back with `item->>'name'` and `item->>'quantity'`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;

use pantry_core::store::{RecipeStore, StoreError};
use pantry_core::{Difficulty, NewRecipe, Recipe, RecipeId, RecipeIngredient, UserId};

use super::{PgStore, RepositoryError};

#[derive(Debug, sqlx::FromRow)]
struct RecipeRow {
    id: RecipeId,
    user_id: UserId,
    title: String,
    description: String,
    cuisine_type: String,
    difficulty: Difficulty,
    ingredients: Json<Vec<RecipeIngredient>>,
    instructions: Vec<String>,
    time_minutes: i32,
    servings: i32,
    is_used: bool,
    created_at: DateTime<Utc>,
    used_at: Option<DateTime<Utc>>,
}

impl TryFrom<RecipeRow> for Recipe {
    type Error = RepositoryError;

    fn try_from(row: RecipeRow) -> Result<Self, Self::Error> {
        if row.is_used != row.used_at.is_some() {
            return Err(RepositoryError::DataCorruption(format!(
                "recipe {} has is_used={} but used_at={:?}",
                row.id, row.is_used, row.used_at
            )));
        }
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            cuisine_type: row.cuisine_type,
            difficulty: row.difficulty,
            ingredients: row.ingredients.0,
            instructions: row.instructions,
            time_minutes: row.time_minutes,
            servings: row.servings,
            is_used: row.is_used,
            created_at: row.created_at,
            used_at: row.used_at,
        })
    }
}

const RECIPE_COLUMNS: &str = "id, user_id, title, description, cuisine_type, difficulty, \
     ingredients, instructions, time_minutes, servings, is_used, created_at, used_at";

impl PgStore {
    async fn recipes(&self, user: UserId) -> Result<Vec<Recipe>, RepositoryError> {
        let rows = sqlx::query_as::<_, RecipeRow>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM pantry.recipe
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(user)
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(Recipe::try_from).collect()
    }

    async fn recipe(&self, user: UserId, id: RecipeId) -> Result<Recipe, RepositoryError> {
        let row = sqlx::query_as::<_, RecipeRow>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM pantry.recipe
             WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user)
        .fetch_optional(self.pool())
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Recipe::try_from(row)
    }

    async fn insert_recipe(&self, user: UserId, recipe: &NewRecipe) -> Result<Recipe, RepositoryError> {
        let row = sqlx::query_as::<_, RecipeRow>(&format!(
            "INSERT INTO pantry.recipe
                (user_id, title, description, cuisine_type, difficulty,
                 ingredients, instructions, time_minutes, servings)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {RECIPE_COLUMNS}"
        ))
        .bind(user)
        .bind(&recipe.title)
        .bind(&recipe.description)
        .bind(&recipe.cuisine_type)
        .bind(recipe.difficulty)
        .bind(Json(&recipe.ingredients))
        .bind(&recipe.instructions)
        .bind(recipe.time_minutes)
        .bind(recipe.servings)
        .fetch_one(self.pool())
        .await?;

        Recipe::try_from(row)
    }

    async fn remove_recipe(&self, user: UserId, id: RecipeId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM pantry.recipe WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl RecipeStore for PgStore {
    async fn list_recipes(&self, user: UserId) -> Result<Vec<Recipe>, StoreError> {
        Ok(self.recipes(user).await?)
    }

    async fn get_recipe(&self, user: UserId, id: RecipeId) -> Result<Recipe, StoreError> {
        Ok(self.recipe(user, id).await?)
    }

    async fn create_recipe(&self, user: UserId, recipe: &NewRecipe) -> Result<Recipe, StoreError> {
        Ok(self.insert_recipe(user, recipe).await?)
    }

    async fn delete_recipe(&self, user: UserId, id: RecipeId) -> Result<(), StoreError> {
        Ok(self.remove_recipe(user, id).await?)
    }
}
