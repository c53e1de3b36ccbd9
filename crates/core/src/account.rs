//! Accounts and their profiles.
//!
//! An account holds sign-in credentials. Its profile (display name and the
//! onboarding latch) is created by the store when the account is inserted,
//! never by application code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Email, UserId};

/// Maximum length of a display name.
pub const DISPLAY_NAME_MAX_LEN: usize = 80;

/// A registered account with its password hash.
#[derive(Clone)]
pub struct Account {
    pub id: UserId,
    pub email: Email,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Data needed to register an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: Email,
    pub display_name: String,
    pub password_hash: String,
}

/// Public profile of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub display_name: String,
    pub onboarding_complete: bool,
    pub created_at: DateTime<Utc>,
}
