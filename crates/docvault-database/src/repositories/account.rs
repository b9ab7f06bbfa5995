//! Account repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::UserId;
use docvault_entity::account::{Account, CreateAccount};

use super::map_write_error;
use crate::store::AccountStore;

/// Repository for account rows.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new account repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find account by email", e)
            })
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find account by id", e)
            })
    }

    async fn create(&self, data: &CreateAccount) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (id, first_name, last_name, email, password_hash, password_salt, role) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(UserId::new())
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.password_salt)
        .bind(data.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "User already exists.", "Failed to create account"))
    }

    async fn update(&self, account: &Account) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "UPDATE accounts SET first_name = $2, last_name = $3, email = $4, \
             password_hash = $5, password_salt = $6, role = $7, refresh_token = $8, \
             refresh_token_expiry = $9, is_active = $10, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(account.id)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.password_salt)
        .bind(account.role)
        .bind(&account.refresh_token)
        .bind(account.refresh_token_expiry)
        .bind(account.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Email already in use", "Failed to update account"))?
        .ok_or_else(|| AppError::not_found(format!("Account {} not found", account.id)))
    }
}
