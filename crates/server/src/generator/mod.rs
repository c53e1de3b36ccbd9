//! Recipe generation backed by the Anthropic Messages API.
//!
//! The model is forced to answer through the `save_recipes` tool so the
//! output arrives as JSON matching a fixed schema. Candidates are checked
//! against the request by the recipe service, not here.

mod client;
mod error;
mod types;

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use pantry_core::generation::CANDIDATE_COUNT;
use pantry_core::inventory::RawQuantity;
use pantry_core::{
    Difficulty, GeneratedRecipe, GenerationError, GenerationRequest, RecipeGenerator,
    RecipeIngredient,
};

use crate::config::GeneratorConfig;

pub use client::AnthropicClient;
pub use error::GeneratorError;
pub use types::{ContentBlock, Message, MessagesRequest, MessagesResponse, Tool, ToolChoice};

/// Name of the forced tool.
const TOOL_NAME: &str = "save_recipes";

const MAX_TOKENS: u32 = 4096;

const SYSTEM_PROMPT: &str = "You are a home cooking assistant. You suggest recipes that can be \
cooked entirely from what the user already has. Use only the listed ingredients, spelled exactly \
as listed, and only the listed utensils. Quantities are plain numbers in the unit the user stocks \
the ingredient in. Respect every dietary restriction. Always answer by calling the save_recipes \
tool.";

/// Build the generator selected by configuration.
///
/// Without an API key, or with a key that cannot be sent, every request
/// fails with [`GenerationError::NotConfigured`].
#[must_use]
pub fn from_config(config: Option<&GeneratorConfig>) -> Arc<dyn RecipeGenerator> {
    let Some(config) = config else {
        tracing::warn!("ANTHROPIC_API_KEY not set, recipe generation disabled");
        return Arc::new(DisabledGenerator);
    };

    match AnthropicClient::new(config) {
        Ok(client) => {
            tracing::info!(model = %client.model(), "Recipe generator configured");
            Arc::new(ClaudeRecipeGenerator::new(client))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to build recipe generator, generation disabled");
            Arc::new(DisabledGenerator)
        }
    }
}

/// Generates recipes with Claude.
#[derive(Clone)]
pub struct ClaudeRecipeGenerator {
    client: AnthropicClient,
}

impl ClaudeRecipeGenerator {
    #[must_use]
    pub const fn new(client: AnthropicClient) -> Self {
        Self { client }
    }

    fn build_request(&self, request: &GenerationRequest) -> MessagesRequest {
        MessagesRequest {
            model: self.client.model().to_owned(),
            max_tokens: MAX_TOKENS,
            system: SYSTEM_PROMPT.to_owned(),
            messages: vec![Message::user(user_prompt(request))],
            tools: vec![save_recipes_tool()],
            tool_choice: ToolChoice::Tool {
                name: TOOL_NAME.to_owned(),
            },
        }
    }
}

#[async_trait]
impl RecipeGenerator for ClaudeRecipeGenerator {
    #[instrument(skip_all, fields(ingredients = request.ingredients.len()))]
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<GeneratedRecipe>, GenerationError> {
        let response = self.client.messages(&self.build_request(request)).await?;

        tracing::debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Generator responded"
        );

        let input = response
            .tool_input(TOOL_NAME)
            .ok_or(GeneratorError::MissingToolCall(TOOL_NAME))?;
        Ok(parse_tool_input(input)?)
    }
}

/// Used when no API key is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl RecipeGenerator for DisabledGenerator {
    async fn generate(
        &self,
        _request: &GenerationRequest,
    ) -> Result<Vec<GeneratedRecipe>, GenerationError> {
        Err(GenerationError::NotConfigured)
    }
}

fn user_prompt(request: &GenerationRequest) -> String {
    let prefs = &request.preferences;
    let mut prompt = String::from("Suggest exactly two different recipes.\n\nIngredients:\n");
    for name in &request.ingredients {
        let _ = writeln!(prompt, "- {name}");
    }

    prompt.push_str("\nUtensils:\n");
    if request.utensils.is_empty() {
        prompt.push_str("- none listed, assume a basic stove and pan\n");
    }
    for name in &request.utensils {
        let _ = writeln!(prompt, "- {name}");
    }

    prompt.push_str("\nPreferences:\n");
    let diets: Vec<&str> = prefs.diets().collect();
    if !diets.is_empty() {
        let _ = writeln!(prompt, "- Diet: {}", diets.join(", "));
    }
    if !prefs.tastes.is_empty() {
        let _ = writeln!(prompt, "- Favourite cuisines: {}", prefs.tastes.join(", "));
    }
    if let Some(difficulty) = prefs.difficulty {
        let _ = writeln!(prompt, "- Difficulty: {difficulty}");
    }
    let _ = writeln!(prompt, "- At most {} minutes", prefs.time_minutes);
    let _ = writeln!(prompt, "- {} portions", prefs.portions);

    prompt
}

fn save_recipes_tool() -> Tool {
    let difficulties: Vec<&str> = Difficulty::ALL.iter().map(Difficulty::as_str).collect();
    Tool {
        name: TOOL_NAME.to_owned(),
        description: "Save the suggested recipes.".to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "recipes": {
                    "type": "array",
                    "minItems": CANDIDATE_COUNT,
                    "maxItems": CANDIDATE_COUNT,
                    "items": {
                        "type": "object",
                        "properties": {
                            "title": {"type": "string"},
                            "description": {"type": "string"},
                            "cuisine_type": {"type": "string"},
                            "difficulty": {"type": "string", "enum": difficulties},
                            "ingredients": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "name": {"type": "string"},
                                        "quantity": {"type": "number", "exclusiveMinimum": 0}
                                    },
                                    "required": ["name", "quantity"]
                                }
                            },
                            "instructions": {"type": "array", "items": {"type": "string"}},
                            "time_minutes": {"type": "integer", "minimum": 0},
                            "servings": {"type": "integer", "minimum": 1}
                        },
                        "required": [
                            "title", "difficulty", "ingredients", "instructions",
                            "time_minutes", "servings"
                        ]
                    }
                }
            },
            "required": ["recipes"]
        }),
    }
}

#[derive(Debug, Deserialize)]
struct ToolInput {
    recipes: Vec<ToolRecipe>,
}

#[derive(Debug, Deserialize)]
struct ToolRecipe {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    cuisine_type: String,
    difficulty: String,
    ingredients: Vec<ToolIngredient>,
    instructions: Vec<String>,
    time_minutes: i32,
    servings: i32,
}

#[derive(Debug, Deserialize)]
struct ToolIngredient {
    name: String,
    quantity: RawQuantity,
}

impl TryFrom<ToolRecipe> for GeneratedRecipe {
    type Error = GeneratorError;

    fn try_from(raw: ToolRecipe) -> Result<Self, Self::Error> {
        let difficulty = raw
            .difficulty
            .parse::<Difficulty>()
            .map_err(|e| GeneratorError::Parse(e.to_string()))?;

        let ingredients = raw
            .ingredients
            .into_iter()
            .map(|item| {
                let quantity = item
                    .quantity
                    .parse_positive("ingredients")
                    .map_err(|e| GeneratorError::Parse(format!("{}: {e}", item.name)))?;
                Ok(RecipeIngredient {
                    name: item.name.trim().to_owned(),
                    quantity,
                })
            })
            .collect::<Result<Vec<_>, GeneratorError>>()?;

        Ok(Self {
            title: raw.title.trim().to_owned(),
            description: raw.description,
            cuisine_type: raw.cuisine_type,
            difficulty,
            ingredients,
            instructions: raw.instructions,
            time_minutes: raw.time_minutes,
            servings: raw.servings,
        })
    }
}

fn parse_tool_input(input: &serde_json::Value) -> Result<Vec<GeneratedRecipe>, GeneratorError> {
    let parsed = ToolInput::deserialize(input)
        .map_err(|e| GeneratorError::Parse(format!("Invalid {TOOL_NAME} input: {e}")))?;
    parsed
        .recipes
        .into_iter()
        .map(GeneratedRecipe::try_from)
        .collect()
}

/// Canned generators for tests.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Clone)]
pub enum StubGenerator {
    /// Two one-ingredient recipes built from the request.
    FromPantry,
    /// Always returns these candidates.
    Fixed(Vec<GeneratedRecipe>),
    /// Always fails as a provider error.
    Failing,
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl RecipeGenerator for StubGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<GeneratedRecipe>, GenerationError> {
        match self {
            Self::FromPantry => {
                let first = request
                    .ingredients
                    .first()
                    .ok_or(GenerationError::NoIngredients)?;
                let last = request.ingredients.last().unwrap_or(first);
                Ok(vec![
                    stub_recipe(&format!("{first} Bowl"), first),
                    stub_recipe(&format!("{last} Stew"), last),
                ])
            }
            Self::Fixed(candidates) => Ok(candidates.clone()),
            Self::Failing => Err(GenerationError::Provider("stub failure".to_owned())),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
fn stub_recipe(title: &str, ingredient: &str) -> GeneratedRecipe {
    GeneratedRecipe {
        title: title.to_owned(),
        description: format!("Simple {ingredient}."),
        cuisine_type: "Home".to_owned(),
        difficulty: Difficulty::Easy,
        ingredients: vec![RecipeIngredient {
            name: ingredient.to_owned(),
            quantity: pantry_core::Quantity::ONE,
        }],
        instructions: vec![format!("Cook the {ingredient}.")],
        time_minutes: 15,
        servings: 2,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pantry_core::Preferences;

    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            ingredients: vec!["Flour".to_owned(), "Eggs".to_owned()],
            utensils: vec!["Whisk".to_owned()],
            preferences: Preferences {
                diet: "Vegetarian, Gluten-free".to_owned(),
                tastes: vec!["French".to_owned()],
                difficulty: Some(Difficulty::Easy),
                time_minutes: 20,
                portions: 3,
            },
        }
    }

    #[test]
    fn test_user_prompt_lists_everything() {
        let prompt = user_prompt(&request());
        assert!(prompt.contains("- Flour\n- Eggs\n"));
        assert!(prompt.contains("- Whisk\n"));
        assert!(prompt.contains("Diet: Vegetarian, Gluten-free"));
        assert!(prompt.contains("Favourite cuisines: French"));
        assert!(prompt.contains("Difficulty: easy"));
        assert!(prompt.contains("At most 20 minutes"));
        assert!(prompt.contains("3 portions"));
    }

    #[test]
    fn test_user_prompt_without_utensils_or_preferences() {
        let mut req = request();
        req.utensils.clear();
        req.preferences = Preferences::default();
        let prompt = user_prompt(&req);
        assert!(prompt.contains("none listed"));
        assert!(!prompt.contains("Diet:"));
        assert!(!prompt.contains("Difficulty:"));
    }

    #[test]
    fn test_tool_schema_asks_for_two_recipes() {
        let tool = save_recipes_tool();
        let recipes = &tool.input_schema["properties"]["recipes"];
        assert_eq!(recipes["minItems"], 2);
        assert_eq!(recipes["maxItems"], 2);
        assert_eq!(
            recipes["items"]["properties"]["difficulty"]["enum"],
            serde_json::json!(["easy", "medium", "hard"])
        );
    }

    #[test]
    fn test_parse_tool_input() {
        let input = serde_json::json!({
            "recipes": [
                {
                    "title": " Crepes ",
                    "description": "Thin pancakes",
                    "cuisine_type": "French",
                    "difficulty": "Easy",
                    "ingredients": [
                        {"name": "Flour", "quantity": 200},
                        {"name": "Eggs", "quantity": "2"}
                    ],
                    "instructions": ["Whisk.", "Fry."],
                    "time_minutes": 20,
                    "servings": 4
                },
                {
                    "title": "Omelette",
                    "difficulty": "medium",
                    "ingredients": [{"name": "Eggs", "quantity": 3}],
                    "instructions": ["Beat.", "Cook."],
                    "time_minutes": 10,
                    "servings": 1
                }
            ]
        });

        let recipes = parse_tool_input(&input).unwrap();
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].title, "Crepes");
        assert_eq!(recipes[0].ingredients[0].quantity.to_string(), "200");
        assert_eq!(recipes[0].ingredients[1].quantity.to_string(), "2");
        assert_eq!(recipes[1].difficulty, Difficulty::Medium);
        assert!(recipes[1].description.is_empty());
    }

    #[test]
    fn test_parse_rejects_bad_difficulty_and_amounts() {
        let bad_difficulty = serde_json::json!({"recipes": [{
            "title": "X", "difficulty": "extreme",
            "ingredients": [{"name": "Eggs", "quantity": 1}],
            "instructions": ["Go."], "time_minutes": 1, "servings": 1
        }]});
        assert!(matches!(
            parse_tool_input(&bad_difficulty),
            Err(GeneratorError::Parse(_))
        ));

        let zero = serde_json::json!({"recipes": [{
            "title": "X", "difficulty": "easy",
            "ingredients": [{"name": "Eggs", "quantity": 0}],
            "instructions": ["Go."], "time_minutes": 1, "servings": 1
        }]});
        assert!(matches!(parse_tool_input(&zero), Err(GeneratorError::Parse(_))));

        assert!(matches!(
            parse_tool_input(&serde_json::json!({"text": "no"})),
            Err(GeneratorError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_disabled_generator_is_not_configured() {
        assert_eq!(
            DisabledGenerator.generate(&request()).await,
            Err(GenerationError::NotConfigured)
        );
        assert_eq!(
            from_config(None).generate(&request()).await,
            Err(GenerationError::NotConfigured)
        );
    }

    #[tokio::test]
    async fn test_stub_uses_only_supplied_ingredients() {
        let candidates = StubGenerator::FromPantry.generate(&request()).await.unwrap();
        let validated =
            pantry_core::generation::validate_candidates(&request(), candidates).unwrap();
        assert_eq!(validated[0].title, "Flour Bowl");
        assert_eq!(validated[1].title, "Eggs Stew");
    }

    #[test]
    fn test_build_request_forces_tool() {
        let client = AnthropicClient::new(&GeneratorConfig {
            api_key: secrecy::SecretString::from("sk-ant-test".to_owned()),
            model: "claude-sonnet-4-20250514".to_owned(),
        })
        .unwrap();
        let body = serde_json::to_value(ClaudeRecipeGenerator::new(client).build_request(&request()))
            .unwrap();
        assert_eq!(body["tool_choice"]["name"], TOOL_NAME);
        assert_eq!(body["tools"][0]["name"], TOOL_NAME);
        assert_eq!(body["messages"][0]["role"], "user");
    }
}
