//! First-run setup gate.
//!
//! The current step is recomputed from live counts on every check. Only the
//! final transition is persisted, as the profile's `onboarding_complete`
//! flag, and that flag never goes back to false.

use serde::{Deserialize, Serialize};

/// Ingredients required before the utensil step.
pub const MIN_INGREDIENTS: u64 = 3;

/// Utensils required before the preference step.
pub const MIN_UTENSILS: u64 = 1;

/// Where a user is in the setup sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    NeedsIngredients,
    NeedsUtensils,
    NeedsPreferences,
    NeedsFirstRecipe,
    Complete,
}

impl OnboardingStep {
    /// Whether setup is finished.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Live facts the gate is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OnboardingSnapshot {
    /// The persisted latch.
    pub flag_complete: bool,
    pub ingredient_count: u64,
    pub utensil_count: u64,
    /// `None` when no preference record exists.
    pub preferences_complete: Option<bool>,
    pub recipe_count: u64,
}

impl OnboardingSnapshot {
    /// Derive the current step.
    ///
    /// A set latch short-circuits everything else: a user who finished setup
    /// and later deleted their stock is not sent back through it.
    #[must_use]
    pub const fn step(&self) -> OnboardingStep {
        if self.flag_complete {
            return OnboardingStep::Complete;
        }
        if self.ingredient_count < MIN_INGREDIENTS {
            return OnboardingStep::NeedsIngredients;
        }
        if self.utensil_count < MIN_UTENSILS {
            return OnboardingStep::NeedsUtensils;
        }
        if !matches!(self.preferences_complete, Some(true)) {
            return OnboardingStep::NeedsPreferences;
        }
        if self.recipe_count == 0 {
            return OnboardingStep::NeedsFirstRecipe;
        }
        // Everything is in place but the latch is unset; the caller sets it.
        OnboardingStep::Complete
    }

    /// Where a freshly signed-in user should land.
    #[must_use]
    pub const fn landing(&self) -> Landing {
        match self.step() {
            OnboardingStep::Complete => Landing::Dashboard,
            step => Landing::Setup(step),
        }
    }
}

/// Destination after sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "screen", content = "step", rename_all = "snake_case")]
pub enum Landing {
    Dashboard,
    Setup(OnboardingStep),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn snapshot(ingredients: u64, utensils: u64, prefs: Option<bool>, recipes: u64) -> OnboardingSnapshot {
        OnboardingSnapshot {
            flag_complete: false,
            ingredient_count: ingredients,
            utensil_count: utensils,
            preferences_complete: prefs,
            recipe_count: recipes,
        }
    }

    #[test]
    fn test_steps_in_order() {
        assert_eq!(snapshot(0, 0, None, 0).step(), OnboardingStep::NeedsIngredients);
        assert_eq!(snapshot(2, 5, Some(true), 1).step(), OnboardingStep::NeedsIngredients);
        assert_eq!(snapshot(3, 0, None, 0).step(), OnboardingStep::NeedsUtensils);
        assert_eq!(snapshot(3, 1, None, 0).step(), OnboardingStep::NeedsPreferences);
        assert_eq!(snapshot(3, 1, Some(false), 0).step(), OnboardingStep::NeedsPreferences);
        assert_eq!(snapshot(3, 1, Some(true), 0).step(), OnboardingStep::NeedsFirstRecipe);
    }

    #[test]
    fn test_preferences_alone_never_complete() {
        let snap = snapshot(10, 10, Some(true), 0);
        assert!(!snap.step().is_complete());
        assert_eq!(snap.landing(), Landing::Setup(OnboardingStep::NeedsFirstRecipe));
    }

    #[test]
    fn test_latch_wins_over_live_counts() {
        let snap = OnboardingSnapshot {
            flag_complete: true,
            ..OnboardingSnapshot::default()
        };
        assert_eq!(snap.step(), OnboardingStep::Complete);
        assert_eq!(snap.landing(), Landing::Dashboard);
    }

    #[test]
    fn test_all_prerequisites_met_is_complete() {
        assert_eq!(snapshot(3, 1, Some(true), 1).step(), OnboardingStep::Complete);
    }

    #[test]
    fn test_step_is_idempotent() {
        let snap = snapshot(3, 0, None, 0);
        assert_eq!(snap.step(), snap.step());
    }

    #[test]
    fn test_landing_serializes_with_step() {
        let json = serde_json::to_value(Landing::Setup(OnboardingStep::NeedsUtensils)).unwrap();
        assert_eq!(json["screen"], "setup");
        assert_eq!(json["step"], "needs_utensils");
    }
}
