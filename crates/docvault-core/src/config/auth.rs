//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Longest accepted access token lifetime: one year.
pub const MAX_ACCESS_TTL_MINUTES: u64 = 365 * 24 * 60;

/// Longest accepted refresh token lifetime: ten years.
pub const MAX_REFRESH_TTL_DAYS: u64 = 3650;

/// Token signing and credential policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Value of the `iss` claim, checked on verification.
    #[serde(default = "default_issuer")]
    pub jwt_issuer: String,
    /// Value of the `aud` claim, checked on verification.
    #[serde(default = "default_audience")]
    pub jwt_audience: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub jwt_access_ttl_minutes: u64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_days: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_issuer: default_issuer(),
            jwt_audience: default_audience(),
            jwt_access_ttl_minutes: default_access_ttl(),
            refresh_token_ttl_days: default_refresh_ttl(),
            password_min_length: default_password_min(),
        }
    }
}

impl AuthConfig {
    /// Rejects token lifetimes that cannot be added to the current time.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_access_ttl_minutes > MAX_ACCESS_TTL_MINUTES {
            return Err(AppError::configuration(format!(
                "auth.jwt_access_ttl_minutes must be at most {MAX_ACCESS_TTL_MINUTES}, got {}",
                self.jwt_access_ttl_minutes
            )));
        }
        if self.refresh_token_ttl_days > MAX_REFRESH_TTL_DAYS {
            return Err(AppError::configuration(format!(
                "auth.refresh_token_ttl_days must be at most {MAX_REFRESH_TTL_DAYS}, got {}",
                self.refresh_token_ttl_days
            )));
        }
        Ok(())
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_issuer() -> String {
    "docvault".to_string()
}

fn default_audience() -> String {
    "docvault-clients".to_string()
}

fn default_access_ttl() -> u64 {
    60
}

fn default_refresh_ttl() -> u64 {
    7
}

fn default_password_min() -> usize {
    8
}
