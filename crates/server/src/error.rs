//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Errors become a JSON body
//! `{"error": code, "message": text, "retryable": bool}`; server-side
//! failures are captured to Sentry before responding and their details are
//! never echoed to clients.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use pantry_core::{CookError, GenerationError, Shortfall, StoreError, ValidationError};

use crate::services::auth::AuthError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client input failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Request body could not be read.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Storage operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Recipe generation failed.
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Resource missing or owned by someone else.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Destructive request sent without `confirm=true`.
    #[error("Deleting a {0} cannot be undone; repeat the request with confirm=true")]
    ConfirmationRequired(&'static str),

    /// Stock does not cover the recipe.
    #[error("{}", .0.first().map_or_else(|| "Insufficient ingredients".to_owned(), Shortfall::describe))]
    Insufficient(Vec<Shortfall>),

    /// Recipe was cooked before.
    #[error("This recipe has already been cooked")]
    AlreadyUsed,

    /// The same action on the same resource is still running.
    #[error("This request is already being processed")]
    InFlight,

    /// No signed-in user.
    #[error("Sign in to continue")]
    Unauthorized,

    /// Session storage failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CookError> for AppError {
    fn from(err: CookError) -> Self {
        match err {
            CookError::NotFound => Self::NotFound("Recipe"),
            CookError::AlreadyUsed => Self::AlreadyUsed,
            CookError::Insufficient(shortfalls) => Self::Insufficient(shortfalls),
            CookError::Store(err) => Self::Store(err),
        }
    }
}

/// JSON error payload.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortfalls: Option<Vec<Shortfall>>,
}

impl AppError {
    /// HTTP status, stable error code and retry hint.
    #[must_use]
    pub const fn classify(&self) -> (StatusCode, &'static str, bool) {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, "validation_error", false)
            }
            Self::Store(err) => match err {
                StoreError::Duplicate(_) => (StatusCode::CONFLICT, "duplicate_key", false),
                StoreError::NotFound => (StatusCode::NOT_FOUND, "not_found", false),
                StoreError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "transient", true),
                StoreError::DataCorruption(_) | StoreError::Internal(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal", false)
                }
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "unauthorized", false),
                AuthError::EmailTaken => (StatusCode::CONFLICT, "duplicate_key", false),
                AuthError::InvalidEmail(_)
                | AuthError::WeakPassword(_)
                | AuthError::InvalidDisplayName(_) => {
                    (StatusCode::BAD_REQUEST, "validation_error", false)
                }
                AuthError::Store(StoreError::Unavailable(_)) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "transient", true)
                }
                AuthError::Store(_) | AuthError::PasswordHash => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal", false)
                }
            },
            Self::Generation(_) => (StatusCode::BAD_GATEWAY, "generation_failed", true),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", false),
            Self::ConfirmationRequired(_) => (
                StatusCode::PRECONDITION_REQUIRED,
                "confirmation_required",
                false,
            ),
            Self::Insufficient(_) => (StatusCode::CONFLICT, "insufficient_ingredient", false),
            Self::AlreadyUsed => (StatusCode::CONFLICT, "already_used", false),
            Self::InFlight => (StatusCode::CONFLICT, "request_in_flight", true),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", false),
            Self::Session(_) | Self::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", false)
            }
        }
    }

    /// Client-facing message. Internal details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::BadRequest(detail) => detail.clone(),
            Self::Store(StoreError::Duplicate(key)) => format!("{key} already exists"),
            Self::Store(StoreError::NotFound) => "Not found".to_owned(),
            Self::Store(StoreError::Unavailable(_)) => {
                "Storage is temporarily unavailable, please try again".to_owned()
            }
            Self::Auth(AuthError::InvalidCredentials) => "Invalid email or password".to_owned(),
            Self::Auth(AuthError::EmailTaken) => {
                "An account with this email already exists".to_owned()
            }
            Self::Auth(AuthError::InvalidEmail(err)) => format!("Invalid email address: {err}"),
            Self::Auth(AuthError::WeakPassword(msg)) => msg.clone(),
            Self::Auth(AuthError::InvalidDisplayName(err)) => err.to_string(),
            Self::Auth(AuthError::Store(StoreError::Unavailable(_))) => {
                "Storage is temporarily unavailable, please try again".to_owned()
            }
            Self::Generation(_) => "Recipe generation failed, please try again".to_owned(),
            Self::NotFound(_)
            | Self::ConfirmationRequired(_)
            | Self::Insufficient(_)
            | Self::AlreadyUsed
            | Self::InFlight
            | Self::Unauthorized => self.to_string(),
            Self::Store(_) | Self::Auth(_) | Self::Session(_) | Self::Internal(_) => {
                "Internal server error".to_owned()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, retryable) = self.classify();

        if status.is_server_error() {
            if retryable {
                tracing::warn!(error = %self, code, "Upstream failure");
            } else {
                let event_id = sentry::capture_error(&self);
                tracing::error!(
                    error = %self,
                    sentry_event_id = %event_id,
                    "Request error"
                );
            }
        }

        let message = self.public_message();
        let shortfalls = match self {
            Self::Insufficient(shortfalls) => Some(shortfalls),
            _ => None,
        };

        let body = ErrorBody {
            error: code,
            message,
            retryable,
            shortfalls,
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
