//! Sign-up, sign-in and session routes.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use pantry_core::store::ProfileStore;
use pantry_core::{Account, Email, Landing, UserId};

use super::extract::ApiJson;
use crate::error::{Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAuth, set_current_user};
use crate::models::CurrentUser;
use crate::services::{AuthService, OnboardingService};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// The signed-in user and their profile.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub email: Email,
    pub display_name: String,
    pub onboarding_complete: bool,
}

#[derive(Debug, Serialize)]
pub struct SignedIn {
    pub user: UserView,
    pub landing: Landing,
}

/// POST /api/auth/sign-up
///
/// Creates the account and signs it in.
pub async fn sign_up(
    State(state): State<AppState>,
    session: Session,
    ApiJson(req): ApiJson<SignUpRequest>,
) -> Result<(StatusCode, Json<SignedIn>)> {
    let account = AuthService::new(state.store())
        .sign_up(&req.email, &req.password, &req.display_name)
        .await?;

    let signed_in = establish_session(&state, &session, &account).await?;
    Ok((StatusCode::CREATED, Json(signed_in)))
}

/// POST /api/auth/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    session: Session,
    ApiJson(req): ApiJson<SignInRequest>,
) -> Result<Json<SignedIn>> {
    let account = AuthService::new(state.store())
        .sign_in(&req.email, &req.password)
        .await?;

    Ok(Json(establish_session(&state, &session, &account).await?))
}

/// POST /api/auth/sign-out
pub async fn sign_out(
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<StatusCode> {
    session.flush().await?;
    clear_sentry_user();
    tracing::info!(user_id = %user.id, "Signed out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/session
pub async fn current_session(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<UserView>> {
    Ok(Json(user_view(&state, &user).await?))
}

async fn establish_session(
    state: &AppState,
    session: &Session,
    account: &Account,
) -> Result<SignedIn> {
    let user = CurrentUser::from(account);

    // New id on every sign-in.
    session.cycle_id().await?;
    set_current_user(session, &user).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    add_breadcrumb("auth", "Signed in", None);
    tracing::info!(user_id = %user.id, "Signed in");

    let landing = OnboardingService::new(state.store()).landing(user.id).await?;
    Ok(SignedIn {
        user: user_view(state, &user).await?,
        landing,
    })
}

async fn user_view(state: &AppState, user: &CurrentUser) -> Result<UserView> {
    let profile = state.store().get_profile(user.id).await?;
    Ok(UserView {
        id: user.id,
        email: user.email.clone(),
        display_name: profile.display_name,
        onboarding_complete: profile.onboarding_complete,
    })
}
