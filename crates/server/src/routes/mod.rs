//! HTTP routes.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                      - Liveness
//! GET    /health/ready                - Store ping
//!
//! # Auth
//! POST   /api/auth/sign-up            - Create account and sign in
//! POST   /api/auth/sign-in            - Sign in, returns landing
//! POST   /api/auth/sign-out           - Flush the session
//! GET    /api/auth/session            - Current user
//!
//! # Setup
//! GET    /api/onboarding              - Current setup step
//! GET    /api/catalog                 - Unit, diet, taste and difficulty suggestions
//!
//! # Inventory
//! GET    /api/ingredients             - Newest first
//! POST   /api/ingredients             - Create (409 on duplicate name)
//! PUT    /api/ingredients             - Upsert by name
//! PATCH  /api/ingredients/{id}        - Edit
//! DELETE /api/ingredients/{id}        - Delete (?confirm=true)
//! GET    /api/utensils                - Newest first
//! POST   /api/utensils                - Create
//! PUT    /api/utensils                - Upsert by name
//! PATCH  /api/utensils/{id}           - Rename
//! DELETE /api/utensils/{id}           - Delete (?confirm=true)
//!
//! # Preferences
//! GET    /api/preferences
//! PUT    /api/preferences             - Full replacement
//!
//! # Recipes
//! POST   /api/recipes/generate        - Two candidates
//! GET    /api/recipes                 - Newest first
//! POST   /api/recipes                 - Save a candidate
//! GET    /api/recipes/{id}
//! DELETE /api/recipes/{id}            - Delete (?confirm=true)
//! POST   /api/recipes/{id}/cook       - Consume stock
//! ```
//!
//! Every `/api` route except sign-up and sign-in requires a session.

pub mod auth;
pub mod catalog;
pub mod extract;
pub mod health;
pub mod ingredients;
pub mod onboarding;
pub mod preferences;
pub mod recipes;
pub mod utensils;

use std::time::Duration;

use axum::{
    Router,
    http::{Request, Response},
    middleware,
    routing::{get, patch, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::service::SignedCookie;
use tower_sessions::{SessionManagerLayer, SessionStore};
use tracing::Span;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Auth routes under `/api/auth`.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(auth::sign_up))
        .route("/sign-in", post(auth::sign_in))
        .route("/sign-out", post(auth::sign_out))
        .route("/session", get(auth::current_session))
}

/// Inventory routes under `/api`.
pub fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/ingredients",
            get(ingredients::list)
                .post(ingredients::create)
                .put(ingredients::upsert),
        )
        .route(
            "/ingredients/{id}",
            patch(ingredients::update).delete(ingredients::delete),
        )
        .route(
            "/utensils",
            get(utensils::list)
                .post(utensils::create)
                .put(utensils::upsert),
        )
        .route(
            "/utensils/{id}",
            patch(utensils::rename).delete(utensils::delete),
        )
}

/// Recipe routes under `/api/recipes`.
pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(recipes::list).post(recipes::save))
        .route("/generate", post(recipes::generate))
        .route("/{id}", get(recipes::show).delete(recipes::delete))
        .route("/{id}/cook", post(recipes::cook))
}

/// All `/api` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .route("/onboarding", get(onboarding::status))
        .route("/catalog", get(catalog::catalog))
        .route(
            "/preferences",
            get(preferences::get).put(preferences::save),
        )
        .merge(inventory_routes())
        .nest("/recipes", recipe_routes())
}

/// The full application with sessions, request ids and tracing.
///
/// Sentry layers are added by the binary so tests run without a hub.
pub fn app<S>(state: AppState, sessions: SessionManagerLayer<S, SignedCookie>) -> Router
where
    S: SessionStore + Clone,
{
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes())
        .layer(sessions)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
