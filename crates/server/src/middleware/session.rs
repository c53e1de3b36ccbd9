//! Session layer backed by `PostgreSQL`.

use sqlx::PgPool;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::cookie::time::Duration;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::{ConfigError, PantryConfig};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "pantry_session";

/// Sessions expire after 7 days without a request.
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer over the `tower_sessions.session` table.
///
/// The table is created by migration, never at startup.
///
/// # Errors
///
/// Returns `ConfigError` if the session secret cannot be used as a signing key.
pub fn create_session_layer(
    pool: &PgPool,
    config: &PantryConfig,
) -> Result<SessionManagerLayer<PostgresStore, SignedCookie>, ConfigError> {
    Ok(session_layer(
        PostgresStore::new(pool.clone()),
        config.secure_cookies(),
        config.session_key()?,
    ))
}

/// Apply the cookie settings to any session store.
///
/// Cookies are signed with `key`; a cookie that fails verification is
/// treated as no session.
#[must_use]
pub fn session_layer<S: SessionStore + Clone>(
    store: S,
    secure: bool,
    key: Key,
) -> SessionManagerLayer<S, SignedCookie> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            SESSION_EXPIRY_SECONDS,
        )))
        .with_secure(secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key)
}
