//! Access token signing and refresh token generation.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use rand::RngCore;
use rand::rngs::OsRng;
use uuid::Uuid;

use docvault_core::config::AuthConfig;
use docvault_core::error::AppError;
use docvault_core::types::UserId;
use docvault_entity::permission::AccessLevel;

use super::claims::Claims;

/// Number of random bytes in a refresh token.
pub const REFRESH_TOKEN_BYTES: usize = 64;

/// Creates signed HS256 access tokens and opaque refresh tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    issuer: String,
    audience: String,
    access_ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("access_ttl", &self.access_ttl)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    ///
    /// Fails with a configuration error if the access TTL does not fit a
    /// `chrono::Duration`.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let access_ttl = i64::try_from(config.jwt_access_ttl_minutes)
            .ok()
            .and_then(Duration::try_minutes)
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "Access token TTL of {} minutes is out of range",
                    config.jwt_access_ttl_minutes
                ))
            })?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.jwt_issuer.clone(),
            audience: config.jwt_audience.clone(),
            access_ttl,
        })
    }

    /// Signs an access token for the account; returns the token and its expiry.
    pub fn issue_access_token(
        &self,
        user_id: UserId,
        email: &str,
        role: AccessLevel,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.access_ttl)
            .ok_or_else(|| AppError::internal("Access token expiry is out of range"))?;

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            role,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))?;

        Ok((token, exp))
    }

    /// Generates an opaque refresh token: 64 bytes from the OS RNG, base64 encoded.
    pub fn issue_refresh_token(&self) -> String {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        STANDARD.encode(bytes)
    }
}
