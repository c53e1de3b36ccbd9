//! Onboarding gate.

use serde::Serialize;
use tracing::instrument;

use pantry_core::store::{ProfileStore, StoreError};
use pantry_core::{Landing, OnboardingSnapshot, OnboardingStep, UserId};

/// Where a user stands in setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OnboardingStatus {
    pub step: OnboardingStep,
    pub complete: bool,
    pub landing: Landing,
}

/// Derives the current setup step from live data.
pub struct OnboardingService<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> OnboardingService<'a, S>
where
    S: ProfileStore + ?Sized,
{
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Recompute the step. Idempotent apart from the latch.
    ///
    /// When every prerequisite holds but the latch is still unset (a save
    /// whose latch write failed), the latch is set here.
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] from reading or latching.
    #[instrument(skip(self), fields(user_id = %user))]
    pub async fn status(&self, user: UserId) -> Result<OnboardingStatus, StoreError> {
        let snapshot = self.store.onboarding_snapshot(user).await?;
        let step = snapshot.step();

        if self.latch_if_ready(user, &snapshot).await? {
            tracing::info!("Onboarding completed on check");
        }

        Ok(OnboardingStatus {
            step,
            complete: step.is_complete(),
            landing: snapshot.landing(),
        })
    }

    /// Set the latch if every step, including a saved recipe, is done.
    ///
    /// Returns whether this call set it.
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] from reading or latching.
    pub async fn complete_if_ready(&self, user: UserId) -> Result<bool, StoreError> {
        let snapshot = self.store.onboarding_snapshot(user).await?;
        self.latch_if_ready(user, &snapshot).await
    }

    async fn latch_if_ready(
        &self,
        user: UserId,
        snapshot: &OnboardingSnapshot,
    ) -> Result<bool, StoreError> {
        if snapshot.flag_complete || !snapshot.step().is_complete() {
            return Ok(false);
        }
        self.store.mark_onboarding_complete(user).await
    }

    /// Where a freshly signed-in user should land.
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] from reading the snapshot.
    pub async fn landing(&self, user: UserId) -> Result<Landing, StoreError> {
        Ok(self.status(user).await?.landing)
    }
}
