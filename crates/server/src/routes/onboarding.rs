//! Onboarding status route.

use axum::{Json, extract::State};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::{OnboardingService, OnboardingStatus};
use crate::state::AppState;

/// GET /api/onboarding
///
/// Recomputed from live data on every call.
pub async fn status(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<OnboardingStatus>> {
    Ok(Json(OnboardingService::new(state.store()).status(user.id).await?))
}
