//! Cooking through the `pantry.cook_recipe` database function.

use async_trait::async_trait;
use tracing::instrument;

use pantry_core::cooking::wire;
use pantry_core::store::{CookingStore, StoreError};
use pantry_core::{CookReply, RecipeId, UserId};

use super::{PgStore, RepositoryError};

impl PgStore {
    #[instrument(skip(self), fields(user_id = %user, recipe_id = %recipe))]
    async fn call_cook_recipe(&self, user: UserId, recipe: RecipeId) -> Result<String, RepositoryError> {
        let reply: String = sqlx::query_scalar("SELECT pantry.cook_recipe($1, $2)")
            .bind(user)
            .bind(recipe)
            .fetch_one(self.pool())
            .await?;
        Ok(reply)
    }
}

#[async_trait]
impl CookingStore for PgStore {
    async fn cook_recipe(&self, user: UserId, recipe: RecipeId) -> Result<CookReply, StoreError> {
        let reply = self.call_cook_recipe(user, recipe).await?;
        wire::parse(&reply).map_err(|e| {
            tracing::error!(error = %e, reply = %reply, "Unreadable cook_recipe reply");
            StoreError::Internal(format!("cook_recipe replied unexpectedly: {e}"))
        })
    }
}
