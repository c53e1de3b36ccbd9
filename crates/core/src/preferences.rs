//! Per-user cooking preferences.
//!
//! One record per user, replaced wholesale on every save. A record can be
//! stored while still incomplete; the onboarding gate only advances once
//! [`Preferences::is_complete`] holds.

use serde::{Deserialize, Serialize};

use crate::types::Difficulty;
use crate::validation::{ValidationError, in_range, required_name};

/// Minutes assumed when the user does not choose a time.
pub const DEFAULT_TIME_MINUTES: i32 = 30;

/// Portions assumed when the user does not choose a count.
pub const DEFAULT_PORTIONS: i32 = 2;

/// Separator used when several diets are stored in the single `diet` field.
pub const DIET_SEPARATOR: &str = ", ";

/// Diets offered by clients.
pub const DIET_OPTIONS: &[&str] = &[
    "Omnivore",
    "Vegetarian",
    "Vegan",
    "Pescatarian",
    "Gluten-free",
    "Dairy-free",
    "Keto",
    "Halal",
    "Kosher",
];

/// Cuisine tastes offered by clients.
pub const TASTE_OPTIONS: &[&str] = &[
    "Italian",
    "Mexican",
    "Chinese",
    "Japanese",
    "Indian",
    "Thai",
    "French",
    "Mediterranean",
    "Middle Eastern",
    "American",
];

/// Stored cooking preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Diets joined with [`DIET_SEPARATOR`]; empty when none chosen.
    pub diet: String,
    pub tastes: Vec<String>,
    pub difficulty: Option<Difficulty>,
    pub time_minutes: i32,
    pub portions: i32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            diet: String::new(),
            tastes: Vec::new(),
            difficulty: None,
            time_minutes: DEFAULT_TIME_MINUTES,
            portions: DEFAULT_PORTIONS,
        }
    }
}

impl Preferences {
    /// Whether every required choice has been made.
    ///
    /// Time and portions carry defaults and never block completion.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.diet.trim().is_empty() && !self.tastes.is_empty() && self.difficulty.is_some()
    }

    /// The individual diets stored in [`Preferences::diet`].
    pub fn diets(&self) -> impl Iterator<Item = &str> {
        self.diet
            .split(DIET_SEPARATOR)
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    /// Validate a submitted form into a full record.
    ///
    /// Selected diets and the optional custom diet are joined into one
    /// field. Duplicate tastes are dropped, keeping first occurrence order.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for overlong entries or out-of-range
    /// time and portion values.
    pub fn from_input(input: &PreferencesInput) -> Result<Self, ValidationError> {
        let mut diets: Vec<String> = Vec::new();
        let custom = input.custom_diet.as_deref().filter(|c| !c.trim().is_empty());
        for raw in input.diet.iter().map(String::as_str).chain(custom) {
            if raw.trim().is_empty() {
                continue;
            }
            let diet = required_name("diet", raw)?;
            if !diets.contains(&diet) {
                diets.push(diet);
            }
        }

        let mut tastes: Vec<String> = Vec::new();
        for raw in &input.tastes {
            if raw.trim().is_empty() {
                continue;
            }
            let taste = required_name("tastes", raw)?;
            if !tastes.contains(&taste) {
                tastes.push(taste);
            }
        }

        Ok(Self {
            diet: diets.join(DIET_SEPARATOR),
            tastes,
            difficulty: input.difficulty,
            time_minutes: in_range(
                "time_minutes",
                input.time_minutes.unwrap_or(DEFAULT_TIME_MINUTES),
                1,
                24 * 60,
            )?,
            portions: in_range("portions", input.portions.unwrap_or(DEFAULT_PORTIONS), 1, 50)?,
        })
    }
}

/// The preference form as submitted by a client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferencesInput {
    #[serde(default)]
    pub diet: Vec<String>,
    #[serde(default)]
    pub custom_diet: Option<String>,
    #[serde(default)]
    pub tastes: Vec<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub time_minutes: Option<i32>,
    #[serde(default)]
    pub portions: Option<i32>,
}
