//! Pantry Core - domain types, storage ports and kitchen rules.
//!
//! This crate is shared by every Pantry component:
//! - `server` - HTTP API, Postgres store and recipe generator adapter
//! - `cli` - migrations and demo data
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure logic - no I/O, no
//! database access, no HTTP clients. Storage and generation are expressed
//! as ports ([`store`], [`generation`]) that the server implements.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, quantities and difficulty
//! - [`inventory`] - Ingredients and utensils with input validation
//! - [`preferences`] - Cooking preferences and completeness
//! - [`recipe`] - Saved recipes and generated candidates
//! - [`cooking`] - The all-or-nothing cook check and its text protocol
//! - [`onboarding`] - Setup steps derived from live counts
//! - [`store`] - Storage ports and [`StoreError`]

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod account;
pub mod cooking;
pub mod generation;
pub mod inventory;
pub mod onboarding;
pub mod preferences;
pub mod recipe;
pub mod store;
pub mod types;
pub mod validation;

pub use account::{Account, NewAccount, Profile};
pub use cooking::{CookError, CookReceipt, CookReply, Shortfall};
pub use generation::{GenerationError, GenerationRequest, RecipeGenerator};
pub use inventory::{Ingredient, NewIngredient, NewUtensil, Utensil};
pub use onboarding::{Landing, OnboardingSnapshot, OnboardingStep};
pub use preferences::Preferences;
pub use recipe::{GeneratedRecipe, NewRecipe, Recipe, RecipeIngredient};
pub use store::{PantryStore, StoreError};
pub use types::*;
pub use validation::ValidationError;
