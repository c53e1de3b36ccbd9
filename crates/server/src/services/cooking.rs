//! Cooking a saved recipe.
//!
//! The store performs the whole check-and-subtract atomically. This service
//! only retries storage failures: a retry can never apply twice because a
//! committed earlier attempt makes the recipe used, and the retry then
//! reports `AlreadyUsed`.

use std::time::Duration;

use tracing::instrument;

use pantry_core::cooking::aggregate_requirements;
use pantry_core::store::{CookingStore, RecipeStore};
use pantry_core::{CookError, CookReceipt, RecipeId, UserId};

/// Retries after the first attempt on transient storage failures.
pub const MAX_RETRIES: u32 = 3;

/// Delay before the first retry; doubled each time.
pub const BASE_BACKOFF: Duration = Duration::from_millis(100);

pub struct CookingService<'a, S: ?Sized> {
    store: &'a S,
    backoff: Duration,
}

impl<'a, S> CookingService<'a, S>
where
    S: CookingStore + RecipeStore + ?Sized,
{
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self {
            store,
            backoff: BASE_BACKOFF,
        }
    }

    /// Override the base retry delay.
    #[must_use]
    pub const fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Cook a recipe against live stock.
    ///
    /// # Errors
    ///
    /// Returns [`CookError::Insufficient`] with every shortfall,
    /// [`CookError::AlreadyUsed`], [`CookError::NotFound`], or
    /// [`CookError::Store`] once retries are exhausted.
    #[instrument(skip(self), fields(user_id = %user, recipe_id = %recipe))]
    pub async fn cook(&self, user: UserId, recipe: RecipeId) -> Result<CookReceipt, CookError> {
        let mut retries = 0;
        loop {
            match self.store.cook_recipe(user, recipe).await {
                Ok(reply) => {
                    if let Err(err) = reply.into_result() {
                        if retries > 0 && matches!(err, CookError::AlreadyUsed) {
                            tracing::warn!(
                                retries,
                                "Recipe already used after a failed attempt; that attempt may have committed"
                            );
                        }
                        return Err(err);
                    }
                    break;
                }
                Err(err) if err.is_transient() && retries < MAX_RETRIES => {
                    let delay = self.backoff * 2u32.pow(retries);
                    retries += 1;
                    tracing::warn!(error = %err, retries, ?delay, "Cook failed transiently, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err.into()),
            }
        }

        tracing::info!("Recipe cooked");

        // The snapshot is immutable, so reading it after the commit is exact.
        let consumed = match self.store.get_recipe(user, recipe).await {
            Ok(stored) => aggregate_requirements(&stored.ingredients),
            Err(e) => {
                tracing::warn!(error = %e, "Cooked, but could not read back the recipe");
                Vec::new()
            }
        };

        Ok(CookReceipt {
            recipe_id: recipe,
            consumed,
        })
    }
}
