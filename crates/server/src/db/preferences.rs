//! Per-user preference record.

use async_trait::async_trait;

use pantry_core::store::{PreferenceStore, StoreError};
use pantry_core::{Difficulty, Preferences, UserId};

use super::{PgStore, RepositoryError};

#[derive(Debug, sqlx::FromRow)]
struct PreferencesRow {
    diet: String,
    tastes: Vec<String>,
    difficulty: Option<Difficulty>,
    time_minutes: i32,
    portions: i32,
}

impl From<PreferencesRow> for Preferences {
    fn from(row: PreferencesRow) -> Self {
        Self {
            diet: row.diet,
            tastes: row.tastes,
            difficulty: row.difficulty,
            time_minutes: row.time_minutes,
            portions: row.portions,
        }
    }
}

impl PgStore {
    async fn preferences(&self, user: UserId) -> Result<Option<Preferences>, RepositoryError> {
        let row = sqlx::query_as::<_, PreferencesRow>(
            r"
            SELECT diet, tastes, difficulty, time_minutes, portions
            FROM pantry.user_preferences
            WHERE user_id = $1
            ",
        )
        .bind(user)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Preferences::from))
    }

    async fn replace_preferences(
        &self,
        user: UserId,
        preferences: &Preferences,
    ) -> Result<Preferences, RepositoryError> {
        let row = sqlx::query_as::<_, PreferencesRow>(
            r"
            INSERT INTO pantry.user_preferences
                (user_id, diet, tastes, difficulty, time_minutes, portions)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO UPDATE
            SET diet = EXCLUDED.diet,
                tastes = EXCLUDED.tastes,
                difficulty = EXCLUDED.difficulty,
                time_minutes = EXCLUDED.time_minutes,
                portions = EXCLUDED.portions,
                updated_at = NOW()
            RETURNING diet, tastes, difficulty, time_minutes, portions
            ",
        )
        .bind(user)
        .bind(&preferences.diet)
        .bind(&preferences.tastes)
        .bind(preferences.difficulty)
        .bind(preferences.time_minutes)
        .bind(preferences.portions)
        .fetch_one(self.pool())
        .await?;

        Ok(row.into())
    }
}

#[async_trait]
impl PreferenceStore for PgStore {
    async fn get_preferences(&self, user: UserId) -> Result<Option<Preferences>, StoreError> {
        Ok(self.preferences(user).await?)
    }

    async fn save_preferences(
        &self,
        user: UserId,
        preferences: &Preferences,
    ) -> Result<Preferences, StoreError> {
        Ok(self.replace_preferences(user, preferences).await?)
    }
}
