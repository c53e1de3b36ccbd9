//! CLI commands.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;

use pantry_server::error::AppError;
use pantry_server::services::AuthError;

/// Errors from any command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Account error: {0}")]
    Auth(#[from] AuthError),

    #[error("{0}")]
    App(#[from] AppError),
}

/// `PANTRY_DATABASE_URL`, falling back to `DATABASE_URL`.
pub fn database_url() -> Result<SecretString, CliError> {
    dotenvy::dotenv().ok();

    std::env::var("PANTRY_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CliError::MissingEnvVar("PANTRY_DATABASE_URL"))
}
