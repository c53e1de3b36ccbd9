//! Accounts, profiles and the onboarding snapshot.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use pantry_core::onboarding::OnboardingSnapshot;
use pantry_core::store::{AccountStore, ProfileStore, StoreError};
use pantry_core::{Account, Email, NewAccount, Profile, UserId};

use super::{PgStore, RepositoryError};

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: UserId,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        Ok(Self {
            id: row.id,
            email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    user_id: UserId,
    display_name: String,
    onboarding_complete: bool,
    created_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            user_id: row.user_id,
            display_name: row.display_name,
            onboarding_complete: row.onboarding_complete,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SnapshotRow {
    onboarding_complete: bool,
    ingredient_count: i64,
    utensil_count: i64,
    has_preferences: bool,
    diet: Option<String>,
    taste_count: Option<i32>,
    has_difficulty: Option<bool>,
    recipe_count: i64,
}

impl From<SnapshotRow> for OnboardingSnapshot {
    fn from(row: SnapshotRow) -> Self {
        let preferences_complete = row.has_preferences.then(|| {
            row.diet.is_some_and(|diet| !diet.trim().is_empty())
                && row.taste_count.unwrap_or(0) > 0
                && row.has_difficulty.unwrap_or(false)
        });
        Self {
            flag_complete: row.onboarding_complete,
            ingredient_count: count(row.ingredient_count),
            utensil_count: count(row.utensil_count),
            preferences_complete,
            recipe_count: count(row.recipe_count),
        }
    }
}

fn count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

impl PgStore {
    async fn insert_account(&self, account: &NewAccount) -> Result<Account, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r"
            INSERT INTO pantry.account (email, password_hash, display_name)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, created_at
            ",
        )
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.display_name)
        .fetch_one(self.pool())
        .await
        .map_err(RepositoryError::conflict_on_unique(format!(
            "account {}",
            account.email
        )))?;

        Account::try_from(row)
    }

    async fn account_by_email(&self, email: &Email) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r"
            SELECT id, email, password_hash, created_at
            FROM pantry.account
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await?;

        row.map(Account::try_from).transpose()
    }

    async fn profile(&self, user: UserId) -> Result<Profile, RepositoryError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r"
            SELECT user_id, display_name, onboarding_complete, created_at
            FROM pantry.profile
            WHERE user_id = $1
            ",
        )
        .bind(user)
        .fetch_optional(self.pool())
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    async fn latch_onboarding(&self, user: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE pantry.profile
            SET onboarding_complete = TRUE
            WHERE user_id = $1 AND NOT onboarding_complete
            ",
        )
        .bind(user)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 1 {
            return Ok(true);
        }
        // Either already latched or no such profile
        self.profile(user).await.map(|_| false)
    }

    async fn snapshot(&self, user: UserId) -> Result<OnboardingSnapshot, RepositoryError> {
        let row = sqlx::query_as::<_, SnapshotRow>(
            r"
            SELECT
                p.onboarding_complete,
                (SELECT COUNT(*) FROM pantry.ingredient i WHERE i.user_id = p.user_id) AS ingredient_count,
                (SELECT COUNT(*) FROM pantry.utensil u WHERE u.user_id = p.user_id) AS utensil_count,
                (up.user_id IS NOT NULL) AS has_preferences,
                up.diet,
                cardinality(up.tastes) AS taste_count,
                (up.difficulty IS NOT NULL) AS has_difficulty,
                (SELECT COUNT(*) FROM pantry.recipe r WHERE r.user_id = p.user_id) AS recipe_count
            FROM pantry.profile p
            LEFT JOIN pantry.user_preferences up ON up.user_id = p.user_id
            WHERE p.user_id = $1
            ",
        )
        .bind(user)
        .fetch_optional(self.pool())
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn create_account(&self, account: &NewAccount) -> Result<Account, StoreError> {
        Ok(self.insert_account(account).await?)
    }

    async fn find_account_by_email(&self, email: &Email) -> Result<Option<Account>, StoreError> {
        Ok(self.account_by_email(email).await?)
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn get_profile(&self, user: UserId) -> Result<Profile, StoreError> {
        Ok(self.profile(user).await?)
    }

    async fn mark_onboarding_complete(&self, user: UserId) -> Result<bool, StoreError> {
        Ok(self.latch_onboarding(user).await?)
    }

    async fn onboarding_snapshot(&self, user: UserId) -> Result<OnboardingSnapshot, StoreError> {
        Ok(self.snapshot(user).await?)
    }
}
