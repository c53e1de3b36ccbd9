//! Suggestion sets rendered by clients.

use axum::Json;
use serde::Serialize;

use pantry_core::Difficulty;
use pantry_core::inventory::SUGGESTED_UNITS;
use pantry_core::preferences::{
    DEFAULT_PORTIONS, DEFAULT_TIME_MINUTES, DIET_OPTIONS, TASTE_OPTIONS,
};

use crate::middleware::RequireAuth;

#[derive(Debug, Serialize)]
pub struct Catalog {
    pub units: &'static [&'static str],
    pub diets: &'static [&'static str],
    pub tastes: &'static [&'static str],
    pub difficulties: [Difficulty; 3],
    pub default_time_minutes: i32,
    pub default_portions: i32,
}

/// GET /api/catalog
///
/// Suggestions only; free text is accepted wherever these are offered.
pub async fn catalog(RequireAuth(_user): RequireAuth) -> Json<Catalog> {
    Json(Catalog {
        units: SUGGESTED_UNITS,
        diets: DIET_OPTIONS,
        tastes: TASTE_OPTIONS,
        difficulties: Difficulty::ALL,
        default_time_minutes: DEFAULT_TIME_MINUTES,
        default_portions: DEFAULT_PORTIONS,
    })
}
