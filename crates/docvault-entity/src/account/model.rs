//! Account entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docvault_core::types::UserId;

use crate::permission::AccessLevel;

/// A registered account in the vault.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    /// Unique account identifier.
    pub id: UserId,
    /// Given name.
    pub first_name: String,
    /// Family name (optional).
    pub last_name: Option<String>,
    /// Login email, unique across accounts.
    pub email: String,
    /// HMAC-SHA512 digest of the password.
    #[serde(skip_serializing)]
    pub password_hash: Vec<u8>,
    /// Random key the digest was computed with.
    #[serde(skip_serializing)]
    pub password_salt: Vec<u8>,
    /// Assigned role.
    pub role: AccessLevel,
    /// The single active refresh token, if the account ever logged in.
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    /// Expiry of `refresh_token`.
    pub refresh_token_expiry: Option<DateTime<Utc>>,
    /// Whether the account may log in.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Check whether `presented` matches the stored refresh token and the
    /// stored expiry lies strictly after `now`.
    pub fn refresh_token_matches(&self, presented: &str, now: DateTime<Utc>) -> bool {
        match (&self.refresh_token, self.refresh_token_expiry) {
            (Some(stored), Some(expiry)) => stored == presented && expiry > now,
            _ => false,
        }
    }

    /// Replace the stored refresh token, invalidating the previous one.
    pub fn rotate_refresh_token(&mut self, token: String, expiry: DateTime<Utc>) {
        self.refresh_token = Some(token);
        self.refresh_token_expiry = Some(expiry);
        self.updated_at = Some(Utc::now());
    }
}

/// Data required to create a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccount {
    /// Given name.
    pub first_name: String,
    /// Family name (optional).
    pub last_name: Option<String>,
    /// Login email.
    pub email: String,
    /// Pre-computed password digest.
    pub password_hash: Vec<u8>,
    /// Salt the digest was computed with.
    pub password_salt: Vec<u8>,
    /// Assigned role.
    pub role: AccessLevel,
}
