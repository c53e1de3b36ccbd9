//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Email and password accounts
//! - `inventory` - Ingredients and utensils
//! - `preferences` - Cooking preferences
//! - `recipes` - Generation, saving and removal
//! - `cooking` - Cooking a saved recipe against stock
//! - `onboarding` - The setup gate
//! - `in_flight` - Duplicate-submission guard
//!
//! Services borrow a store (and a generator where needed) for the length of
//! one request. Every call takes the acting [`pantry_core::UserId`].

pub mod auth;
pub mod cooking;
pub mod in_flight;
pub mod inventory;
pub mod onboarding;
pub mod preferences;
pub mod recipes;

pub use auth::{AuthError, AuthService};
pub use cooking::CookingService;
pub use in_flight::{InFlight, InFlightGuard};
pub use inventory::InventoryService;
pub use onboarding::{OnboardingService, OnboardingStatus};
pub use preferences::{PreferenceService, PreferencesView};
pub use recipes::{RecipeService, SavedRecipe};
