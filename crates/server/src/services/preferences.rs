//! Preference reads and saves.

use serde::Serialize;
use tracing::instrument;

use pantry_core::Preferences;
use pantry_core::UserId;
use pantry_core::preferences::PreferencesInput;
use pantry_core::store::PreferenceStore;

use crate::error::Result;

/// Stored preferences, or the defaults when none are saved yet.
#[derive(Debug, Clone, Serialize)]
pub struct PreferencesView {
    pub preferences: Preferences,
    pub saved: bool,
    pub complete: bool,
}

impl PreferencesView {
    fn new(stored: Option<Preferences>) -> Self {
        let saved = stored.is_some();
        let preferences = stored.unwrap_or_default();
        Self {
            complete: preferences.is_complete(),
            preferences,
            saved,
        }
    }
}

pub struct PreferenceService<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> PreferenceService<'a, S>
where
    S: PreferenceStore + ?Sized,
{
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn get(&self, user: UserId) -> Result<PreferencesView> {
        Ok(PreferencesView::new(self.store.get_preferences(user).await?))
    }

    /// Replace the whole record.
    ///
    /// Saving never completes onboarding on its own.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, or the store error.
    #[instrument(skip(self, input), fields(user_id = %user))]
    pub async fn save(&self, user: UserId, input: &PreferencesInput) -> Result<PreferencesView> {
        let preferences = Preferences::from_input(input)?;
        let saved = self.store.save_preferences(user, &preferences).await?;
        Ok(PreferencesView::new(Some(saved)))
    }
}
