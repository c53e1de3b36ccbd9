//! Ingredient and utensil repositories.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use pantry_core::store::{InventoryStore, StoreError};
use pantry_core::{
    Ingredient, IngredientId, NewIngredient, NewUtensil, Quantity, UserId, Utensil, UtensilId,
};
use pantry_core::inventory::IngredientChanges;

use super::{PgStore, RepositoryError};

#[derive(Debug, sqlx::FromRow)]
struct IngredientRow {
    id: IngredientId,
    user_id: UserId,
    name: String,
    quantity: Quantity,
    unit: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            quantity: row.quantity,
            unit: row.unit,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UtensilRow {
    id: UtensilId,
    user_id: UserId,
    name: String,
    created_at: DateTime<Utc>,
}

impl From<UtensilRow> for Utensil {
    fn from(row: UtensilRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

const INGREDIENT_COLUMNS: &str = "id, user_id, name, quantity, unit, created_at, updated_at";
const UTENSIL_COLUMNS: &str = "id, user_id, name, created_at";

impl PgStore {
    async fn ingredients(&self, user: UserId) -> Result<Vec<Ingredient>, RepositoryError> {
        let rows = sqlx::query_as::<_, IngredientRow>(&format!(
            "SELECT {INGREDIENT_COLUMNS} FROM pantry.ingredient
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(user)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Ingredient::from).collect())
    }

    async fn insert_ingredient(
        &self,
        user: UserId,
        ingredient: &NewIngredient,
    ) -> Result<Ingredient, RepositoryError> {
        let row = sqlx::query_as::<_, IngredientRow>(&format!(
            "INSERT INTO pantry.ingredient (user_id, name, quantity, unit)
             VALUES ($1, $2, $3, $4)
             RETURNING {INGREDIENT_COLUMNS}"
        ))
        .bind(user)
        .bind(&ingredient.name)
        .bind(ingredient.quantity)
        .bind(&ingredient.unit)
        .fetch_one(self.pool())
        .await
        .map_err(RepositoryError::conflict_on_unique(format!(
            "ingredient {}",
            ingredient.name
        )))?;

        Ok(row.into())
    }

    async fn put_ingredient(
        &self,
        user: UserId,
        ingredient: &NewIngredient,
    ) -> Result<Ingredient, RepositoryError> {
        let row = sqlx::query_as::<_, IngredientRow>(&format!(
            "INSERT INTO pantry.ingredient (user_id, name, quantity, unit)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (user_id, name) DO UPDATE
             SET quantity = EXCLUDED.quantity,
                 unit = EXCLUDED.unit,
                 updated_at = NOW()
             RETURNING {INGREDIENT_COLUMNS}"
        ))
        .bind(user)
        .bind(&ingredient.name)
        .bind(ingredient.quantity)
        .bind(&ingredient.unit)
        .fetch_one(self.pool())
        .await?;

        Ok(row.into())
    }

    async fn patch_ingredient(
        &self,
        user: UserId,
        id: IngredientId,
        changes: &IngredientChanges,
    ) -> Result<Ingredient, RepositoryError> {
        let key = changes
            .name
            .as_deref()
            .map_or_else(|| format!("ingredient {id}"), |name| format!("ingredient {name}"));

        let row = sqlx::query_as::<_, IngredientRow>(&format!(
            "UPDATE pantry.ingredient
             SET name = COALESCE($3, name),
                 quantity = COALESCE($4, quantity),
                 unit = COALESCE($5, unit),
                 updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {INGREDIENT_COLUMNS}"
        ))
        .bind(id)
        .bind(user)
        .bind(changes.name.as_deref())
        .bind(changes.quantity)
        .bind(changes.unit.as_deref())
        .fetch_optional(self.pool())
        .await
        .map_err(RepositoryError::conflict_on_unique(key))?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    async fn remove_ingredient(&self, user: UserId, id: IngredientId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM pantry.ingredient WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn utensils(&self, user: UserId) -> Result<Vec<Utensil>, RepositoryError> {
        let rows = sqlx::query_as::<_, UtensilRow>(&format!(
            "SELECT {UTENSIL_COLUMNS} FROM pantry.utensil
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(user)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Utensil::from).collect())
    }

    async fn insert_utensil(
        &self,
        user: UserId,
        utensil: &NewUtensil,
    ) -> Result<Utensil, RepositoryError> {
        let row = sqlx::query_as::<_, UtensilRow>(&format!(
            "INSERT INTO pantry.utensil (user_id, name)
             VALUES ($1, $2)
             RETURNING {UTENSIL_COLUMNS}"
        ))
        .bind(user)
        .bind(&utensil.name)
        .fetch_one(self.pool())
        .await
        .map_err(RepositoryError::conflict_on_unique(format!(
            "utensil {}",
            utensil.name
        )))?;

        Ok(row.into())
    }

    async fn put_utensil(&self, user: UserId, utensil: &NewUtensil) -> Result<Utensil, RepositoryError> {
        // The no-op update makes RETURNING yield the existing row.
        let row = sqlx::query_as::<_, UtensilRow>(&format!(
            "INSERT INTO pantry.utensil (user_id, name)
             VALUES ($1, $2)
             ON CONFLICT (user_id, name) DO UPDATE SET name = EXCLUDED.name
             RETURNING {UTENSIL_COLUMNS}"
        ))
        .bind(user)
        .bind(&utensil.name)
        .fetch_one(self.pool())
        .await?;

        Ok(row.into())
    }

    async fn rename(
        &self,
        user: UserId,
        id: UtensilId,
        utensil: &NewUtensil,
    ) -> Result<Utensil, RepositoryError> {
        let row = sqlx::query_as::<_, UtensilRow>(&format!(
            "UPDATE pantry.utensil SET name = $3
             WHERE id = $1 AND user_id = $2
             RETURNING {UTENSIL_COLUMNS}"
        ))
        .bind(id)
        .bind(user)
        .bind(&utensil.name)
        .fetch_optional(self.pool())
        .await
        .map_err(RepositoryError::conflict_on_unique(format!(
            "utensil {}",
            utensil.name
        )))?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    async fn remove_utensil(&self, user: UserId, id: UtensilId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM pantry.utensil WHERE id = $1 AND user_id = $2")
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
impl InventoryStore for PgStore {
    async fn list_ingredients(&self, user: UserId) -> Result<Vec<Ingredient>, StoreError> {
        Ok(self.ingredients(user).await?)
    }

    async fn create_ingredient(
        &self,
        user: UserId,
        ingredient: &NewIngredient,
    ) -> Result<Ingredient, StoreError> {
        Ok(self.insert_ingredient(user, ingredient).await?)
    }

    async fn upsert_ingredient(
        &self,
        user: UserId,
        ingredient: &NewIngredient,
    ) -> Result<Ingredient, StoreError> {
        Ok(self.put_ingredient(user, ingredient).await?)
    }

    async fn update_ingredient(
        &self,
        user: UserId,
        id: IngredientId,
        changes: &IngredientChanges,
    ) -> Result<Ingredient, StoreError> {
        Ok(self.patch_ingredient(user, id, changes).await?)
    }

    async fn delete_ingredient(&self, user: UserId, id: IngredientId) -> Result<(), StoreError> {
        Ok(self.remove_ingredient(user, id).await?)
    }

    async fn list_utensils(&self, user: UserId) -> Result<Vec<Utensil>, StoreError> {
        Ok(self.utensils(user).await?)
    }

    async fn create_utensil(&self, user: UserId, utensil: &NewUtensil) -> Result<Utensil, StoreError> {
        Ok(self.insert_utensil(user, utensil).await?)
    }

    async fn upsert_utensil(&self, user: UserId, utensil: &NewUtensil) -> Result<Utensil, StoreError> {
        Ok(self.put_utensil(user, utensil).await?)
    }

    async fn rename_utensil(
        &self,
        user: UserId,
        id: UtensilId,
        utensil: &NewUtensil,
    ) -> Result<Utensil, StoreError> {
        Ok(self.rename(user, id, utensil).await?)
    }

    async fn delete_utensil(&self, user: UserId, id: UtensilId) -> Result<(), StoreError> {
        Ok(self.remove_utensil(user, id).await?)
    }
}
