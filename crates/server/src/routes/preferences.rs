//! Preference routes.

use axum::{Json, extract::State};

use pantry_core::preferences::PreferencesInput;

use super::extract::ApiJson;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::{PreferenceService, PreferencesView};
use crate::state::AppState;

/// GET /api/preferences
///
/// Defaults with `saved: false` until the first save.
pub async fn get(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<PreferencesView>> {
    Ok(Json(PreferenceService::new(state.store()).get(user.id).await?))
}

/// PUT /api/preferences
///
/// Full replacement.
pub async fn save(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(input): ApiJson<PreferencesInput>,
) -> Result<Json<PreferencesView>> {
    Ok(Json(
        PreferenceService::new(state.store())
            .save(user.id, &input)
            .await?,
    ))
}
