//! Ingredient routes.

use axum::{Json, extract::State, http::StatusCode};

use pantry_core::inventory::{IngredientInput, IngredientPatch};
use pantry_core::{Ingredient, IngredientId};

use super::extract::{ApiJson, ApiPath, ApiQuery, DeleteQuery};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::services::InventoryService;
use crate::state::AppState;

/// GET /api/ingredients
///
/// Newest first.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Ingredient>>> {
    Ok(Json(InventoryService::new(state.store()).ingredients(user.id).await?))
}

/// POST /api/ingredients
///
/// 409 when the name is already stocked; the existing row is untouched.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(input): ApiJson<IngredientInput>,
) -> Result<(StatusCode, Json<Ingredient>)> {
    let ingredient = InventoryService::new(state.store())
        .add_ingredient(user.id, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(ingredient)))
}

/// PUT /api/ingredients
///
/// Insert, or update quantity and unit of the row with the same name.
pub async fn upsert(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(input): ApiJson<IngredientInput>,
) -> Result<Json<Ingredient>> {
    Ok(Json(
        InventoryService::new(state.store())
            .put_ingredient(user.id, &input)
            .await?,
    ))
}

/// PATCH /api/ingredients/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<IngredientId>,
    ApiJson(patch): ApiJson<IngredientPatch>,
) -> Result<Json<Ingredient>> {
    Ok(Json(
        InventoryService::new(state.store())
            .edit_ingredient(user.id, id, &patch)
            .await?,
    ))
}

/// DELETE /api/ingredients/{id}?confirm=true
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<IngredientId>,
    ApiQuery(query): ApiQuery<DeleteQuery>,
) -> Result<StatusCode> {
    let _guard = state
        .in_flight()
        .try_begin(user.id, "delete_ingredient", id.to_string())
        .ok_or(AppError::InFlight)?;

    InventoryService::new(state.store())
        .remove_ingredient(user.id, id, query.confirm)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
