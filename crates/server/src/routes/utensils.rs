//! Utensil routes.

use axum::{Json, extract::State, http::StatusCode};

use pantry_core::inventory::UtensilInput;
use pantry_core::{Utensil, UtensilId};

use super::extract::{ApiJson, ApiPath, ApiQuery, DeleteQuery};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::services::InventoryService;
use crate::state::AppState;

/// GET /api/utensils
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Utensil>>> {
    Ok(Json(InventoryService::new(state.store()).utensils(user.id).await?))
}

/// POST /api/utensils
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(input): ApiJson<UtensilInput>,
) -> Result<(StatusCode, Json<Utensil>)> {
    let utensil = InventoryService::new(state.store())
        .add_utensil(user.id, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(utensil)))
}

/// PUT /api/utensils
///
/// Returns the existing row when the name is already listed.
pub async fn upsert(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(input): ApiJson<UtensilInput>,
) -> Result<Json<Utensil>> {
    Ok(Json(
        InventoryService::new(state.store())
            .put_utensil(user.id, &input)
            .await?,
    ))
}

/// PATCH /api/utensils/{id}
pub async fn rename(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<UtensilId>,
    ApiJson(input): ApiJson<UtensilInput>,
) -> Result<Json<Utensil>> {
    Ok(Json(
        InventoryService::new(state.store())
            .rename_utensil(user.id, id, &input)
            .await?,
    ))
}

/// DELETE /api/utensils/{id}?confirm=true
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<UtensilId>,
    ApiQuery(query): ApiQuery<DeleteQuery>,
) -> Result<StatusCode> {
    let _guard = state
        .in_flight()
        .try_begin(user.id, "delete_utensil", id.to_string())
        .ok_or(AppError::InFlight)?;

    InventoryService::new(state.store())
        .remove_utensil(user.id, id, query.confirm)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
