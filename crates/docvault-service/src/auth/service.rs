//! Account registration and credential exchange.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use docvault_auth::jwt::JwtEncoder;
use docvault_auth::password::{PasswordHasher, PasswordValidator};
use docvault_core::config::AuthConfig;
use docvault_core::error::AppError;
use docvault_core::types::UserId;
use docvault_database::store::AccountStore;
use docvault_entity::account::{Account, CreateAccount};
use docvault_entity::permission::AccessLevel;

/// Message returned for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Message returned for every failed refresh, whatever the cause.
pub const INVALID_REFRESH: &str = "Invalid or expired refresh token";

/// Request to register a new account.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Given name.
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: String,
    /// Family name.
    #[validate(length(max = 50, message = "Last name must be at most 50 characters"))]
    pub last_name: Option<String>,
    /// Login email.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Plaintext password, checked against the password policy.
    pub password: String,
    /// Requested role (Viewer when absent).
    pub role: Option<AccessLevel>,
}

/// Result of a successful registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// The new account's ID.
    pub user_id: UserId,
    /// The registered email.
    pub email: String,
    /// Human-readable outcome.
    pub message: String,
}

/// Result of a successful login or refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed access token.
    pub access_token: String,
    /// Opaque refresh token, now the only valid one for the account.
    pub refresh_token: String,
    /// Access token expiry.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiry.
    pub refresh_expires_at: DateTime<Utc>,
    /// Human-readable outcome.
    pub message: String,
}

/// Handles registration, login and refresh-token rotation.
#[derive(Debug, Clone)]
pub struct AuthService {
    /// Account store.
    accounts: Arc<dyn AccountStore>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password policy.
    validator: Arc<PasswordValidator>,
    /// Token issuer.
    encoder: Arc<JwtEncoder>,
    /// Lifetime of a freshly issued refresh token.
    refresh_ttl: Duration,
}

impl AuthService {
    /// Creates a new auth service.
    ///
    /// Fails with a configuration error if the refresh TTL does not fit a
    /// `chrono::Duration`.
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        hasher: Arc<PasswordHasher>,
        encoder: Arc<JwtEncoder>,
        config: &AuthConfig,
    ) -> Result<Self, AppError> {
        let refresh_ttl = i64::try_from(config.refresh_token_ttl_days)
            .ok()
            .and_then(Duration::try_days)
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "Refresh token TTL of {} days is out of range",
                    config.refresh_token_ttl_days
                ))
            })?;

        Ok(Self {
            accounts,
            hasher,
            validator: Arc::new(PasswordValidator::new(config)),
            encoder,
            refresh_ttl,
        })
    }

    /// Registers a new account.
    ///
    /// Fails with a conflict if the email is already registered and with a
    /// validation error if the request or the password policy is violated.
    pub async fn register(&self, req: RegisterRequest) -> Result<RegisterResponse, AppError> {
        if self.accounts.find_by_email(&req.email).await?.is_some() {
            return Err(AppError::conflict("User already exists."));
        }

        req.validate()
            .map_err(|e| AppError::validation(format!("Invalid registration request: {e}")))?;
        self.validator.validate(&req.password)?;

        let (password_hash, password_salt) = self.hasher.hash_password(&req.password)?;

        let account = self
            .accounts
            .create(&CreateAccount {
                first_name: req.first_name,
                last_name: req.last_name,
                email: req.email,
                password_hash,
                password_salt,
                role: req.role.unwrap_or_default(),
            })
            .await?;

        info!(user_id = %account.id, role = %account.role, "Account registered");

        Ok(RegisterResponse {
            user_id: account.id,
            email: account.email,
            message: "User Registered Successfully".to_string(),
        })
    }

    /// Exchanges email and password for a token pair.
    ///
    /// Unknown email, wrong password and inactive account are
    /// indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, AppError> {
        let Some(account) = self.accounts.find_by_email(email).await? else {
            warn!("Login rejected: unknown email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        let password_ok =
            self.hasher
                .verify_password(password, &account.password_hash, &account.password_salt);

        if !password_ok {
            warn!(user_id = %account.id, "Login rejected: wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        if !account.is_active {
            warn!(user_id = %account.id, "Login rejected: account inactive");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let tokens = self.rotate_tokens(account, "Logged in Successfully").await?;
        Ok(tokens)
    }

    /// Exchanges the stored refresh token for a new token pair.
    ///
    /// The presented token must equal the stored one and not be expired.
    /// On success both tokens are replaced, so the presented one stops
    /// working.
    pub async fn refresh(&self, email: &str, presented: &str) -> Result<TokenResponse, AppError> {
        let Some(account) = self.accounts.find_by_email(email).await? else {
            warn!("Refresh rejected: unknown email");
            return Err(AppError::unauthorized(INVALID_REFRESH));
        };

        if !account.is_active || !account.refresh_token_matches(presented, Utc::now()) {
            warn!(user_id = %account.id, "Refresh rejected: token mismatch or expired");
            return Err(AppError::unauthorized(INVALID_REFRESH));
        }

        self.rotate_tokens(account, "Token refreshed successfully")
            .await
    }

    /// Issues a fresh access/refresh pair and persists the new refresh token.
    async fn rotate_tokens(
        &self,
        mut account: Account,
        message: &str,
    ) -> Result<TokenResponse, AppError> {
        let (access_token, access_expires_at) =
            self.encoder
                .issue_access_token(account.id, &account.email, account.role)?;

        let refresh_token = self.encoder.issue_refresh_token();
        let refresh_expires_at = Utc::now()
            .checked_add_signed(self.refresh_ttl)
            .ok_or_else(|| AppError::internal("Refresh token expiry is out of range"))?;

        account.rotate_refresh_token(refresh_token.clone(), refresh_expires_at);
        let account = self.accounts.update(&account).await?;

        info!(user_id = %account.id, "Refresh token rotated");

        Ok(TokenResponse {
            access_token,
            refresh_token,
            access_expires_at,
            refresh_expires_at,
            message: message.to_string(),
        })
    }
}
