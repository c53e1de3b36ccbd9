//! Recipe generation, storage and cooking routes.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use pantry_core::{GeneratedRecipe, Recipe, RecipeId, RecipeIngredient};

use super::extract::{ApiJson, ApiPath, ApiQuery, DeleteQuery};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::services::{CookingService, RecipeService, SavedRecipe};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Candidates {
    pub candidates: Vec<GeneratedRecipe>,
}

#[derive(Debug, Serialize)]
pub struct Cooked {
    pub recipe_id: RecipeId,
    pub consumed: Vec<RecipeIngredient>,
    pub message: &'static str,
}

/// POST /api/recipes/generate
///
/// Two candidates from live stock. Nothing is stored.
pub async fn generate(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Candidates>> {
    let candidates = RecipeService::new(state.store(), state.generator())
        .generate(user.id)
        .await?;
    Ok(Json(Candidates { candidates }))
}

/// GET /api/recipes
///
/// Newest first.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Recipe>>> {
    Ok(Json(
        RecipeService::new(state.store(), state.generator())
            .list(user.id)
            .await?,
    ))
}

/// POST /api/recipes
///
/// Saves a generated candidate. The first save finishes onboarding.
pub async fn save(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(candidate): ApiJson<GeneratedRecipe>,
) -> Result<(StatusCode, Json<SavedRecipe>)> {
    let _guard = state
        .in_flight()
        .try_begin(user.id, "save_recipe", candidate.title.trim().to_lowercase())
        .ok_or(AppError::InFlight)?;

    let saved = RecipeService::new(state.store(), state.generator())
        .save(user.id, &candidate)
        .await?;
    add_breadcrumb("recipe", "Recipe saved", None);
    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /api/recipes/{id}
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<RecipeId>,
) -> Result<Json<Recipe>> {
    Ok(Json(
        RecipeService::new(state.store(), state.generator())
            .get(user.id, id)
            .await?,
    ))
}

/// DELETE /api/recipes/{id}?confirm=true
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<RecipeId>,
    ApiQuery(query): ApiQuery<DeleteQuery>,
) -> Result<StatusCode> {
    let _guard = state
        .in_flight()
        .try_begin(user.id, "delete_recipe", id.to_string())
        .ok_or(AppError::InFlight)?;

    RecipeService::new(state.store(), state.generator())
        .remove(user.id, id, query.confirm)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/recipes/{id}/cook
///
/// Subtracts every requirement from stock and marks the recipe used, or
/// changes nothing.
pub async fn cook(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<RecipeId>,
) -> Result<Json<Cooked>> {
    let _guard = state
        .in_flight()
        .try_begin(user.id, "cook_recipe", id.to_string())
        .ok_or(AppError::InFlight)?;

    let receipt = CookingService::new(state.store()).cook(user.id, id).await?;
    add_breadcrumb("recipe", "Recipe cooked", None);
    Ok(Json(Cooked {
        recipe_id: receipt.recipe_id,
        consumed: receipt.consumed,
        message: "Recipe cooked",
    }))
}
