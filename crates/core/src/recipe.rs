//! Saved recipes and the generated candidates they are created from.
//!
//! A recipe's ingredient list is a snapshot of names and amounts taken when
//! the recipe was generated. It is never linked to inventory rows; cooking
//! matches it against live stock by name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Difficulty, Quantity, RecipeId, UserId};
use crate::validation::{ValidationError, in_range, required_name, required_text};

/// Maximum length of a recipe title.
pub const TITLE_MAX_LEN: usize = 200;

/// Maximum length of a recipe description or a single instruction.
pub const TEXT_MAX_LEN: usize = 2000;

/// One line of a recipe's ingredient list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub name: String,
    pub quantity: Quantity,
}

/// A recipe candidate returned by the generator, not yet stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedRecipe {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cuisine_type: String,
    pub difficulty: Difficulty,
    pub ingredients: Vec<RecipeIngredient>,
    pub instructions: Vec<String>,
    pub time_minutes: i32,
    pub servings: i32,
}

/// A validated recipe ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub title: String,
    pub description: String,
    pub cuisine_type: String,
    pub difficulty: Difficulty,
    pub ingredients: Vec<RecipeIngredient>,
    pub instructions: Vec<String>,
    pub time_minutes: i32,
    pub servings: i32,
}

impl NewRecipe {
    /// Validate a generated candidate for saving.
    ///
    /// Blank instructions are dropped. Ingredient order and duplicates are
    /// preserved as generated.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the title is missing, there is no
    /// ingredient or instruction, or an ingredient amount is not positive.
    pub fn from_generated(recipe: &GeneratedRecipe) -> Result<Self, ValidationError> {
        let title = required_text("title", &recipe.title, TITLE_MAX_LEN)?;

        if recipe.ingredients.is_empty() {
            return Err(ValidationError::Empty {
                field: "ingredients",
            });
        }
        let ingredients = recipe
            .ingredients
            .iter()
            .map(|item| {
                let name = required_name("ingredients", &item.name)?;
                let quantity = Quantity::positive(item.quantity.as_decimal()).map_err(|source| {
                    ValidationError::Quantity {
                        field: "ingredients",
                        source,
                    }
                })?;
                Ok(RecipeIngredient { name, quantity })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        let instructions = recipe
            .instructions
            .iter()
            .filter(|step| !step.trim().is_empty())
            .map(|step| required_text("instructions", step, TEXT_MAX_LEN))
            .collect::<Result<Vec<_>, _>>()?;
        if instructions.is_empty() {
            return Err(ValidationError::Empty {
                field: "instructions",
            });
        }

        let description = recipe.description.trim();
        if description.chars().count() > TEXT_MAX_LEN {
            return Err(ValidationError::TooLong {
                field: "description",
                max: TEXT_MAX_LEN,
            });
        }

        Ok(Self {
            title,
            description: description.to_owned(),
            cuisine_type: recipe.cuisine_type.trim().to_owned(),
            difficulty: recipe.difficulty,
            ingredients,
            instructions,
            time_minutes: in_range("time_minutes", recipe.time_minutes, 0, 24 * 60)?,
            servings: in_range("servings", recipe.servings, 1, 50)?,
        })
    }
}

/// A stored recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub cuisine_type: String,
    pub difficulty: Difficulty,
    pub ingredients: Vec<RecipeIngredient>,
    pub instructions: Vec<String>,
    pub time_minutes: i32,
    pub servings: i32,
    pub is_used: bool,
    pub created_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn flour_cake() -> GeneratedRecipe {
        GeneratedRecipe {
            title: " Flour Cake ".to_owned(),
            description: "Plain but honest.".to_owned(),
            cuisine_type: "French".to_owned(),
            difficulty: Difficulty::Easy,
            ingredients: vec![RecipeIngredient {
                name: "Flour".to_owned(),
                quantity: "200".parse().unwrap(),
            }],
            instructions: vec!["Mix.".to_owned(), "  ".to_owned(), "Bake.".to_owned()],
            time_minutes: 45,
            servings: 4,
        }
    }

    #[test]
    fn test_from_generated_trims_and_drops_blank_steps() {
        let recipe = NewRecipe::from_generated(&flour_cake()).unwrap();
        assert_eq!(recipe.title, "Flour Cake");
        assert_eq!(recipe.instructions, ["Mix.", "Bake."]);
    }

    #[test]
    fn test_from_generated_requires_ingredients() {
        let mut candidate = flour_cake();
        candidate.ingredients.clear();
        assert_eq!(
            NewRecipe::from_generated(&candidate),
            Err(ValidationError::Empty {
                field: "ingredients"
            })
        );
    }

    #[test]
    fn test_from_generated_rejects_zero_amounts() {
        let mut candidate = flour_cake();
        candidate.ingredients[0].quantity = Quantity::ZERO;
        assert_eq!(
            NewRecipe::from_generated(&candidate).unwrap_err().field(),
            "ingredients"
        );
    }

    #[test]
    fn test_from_generated_requires_instructions() {
        let mut candidate = flour_cake();
        candidate.instructions = vec![" ".to_owned()];
        assert_eq!(
            NewRecipe::from_generated(&candidate).unwrap_err().field(),
            "instructions"
        );
    }

    #[test]
    fn test_generated_recipe_deserializes_string_amounts() {
        let json = r#"{
            "title": "Toast",
            "difficulty": "easy",
            "ingredients": [{"name": "Bread", "quantity": "2"}],
            "instructions": ["Toast the bread."],
            "time_minutes": 5,
            "servings": 1
        }"#;
        let candidate: GeneratedRecipe = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.ingredients[0].quantity.to_string(), "2");
        assert!(candidate.description.is_empty());
    }
}
