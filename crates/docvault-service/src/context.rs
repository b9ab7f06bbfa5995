//! Request context carrying the authenticated account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docvault_auth::jwt::Claims;
use docvault_core::types::UserId;
use docvault_entity::permission::AccessLevel;

/// Context for the current authenticated request.
///
/// Built by the boundary layer from verified access token claims and
/// passed into every service method so that each operation knows who is
/// acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated account's ID.
    pub user_id: UserId,
    /// Email from the token.
    pub email: String,
    /// Account role at the time the token was issued.
    pub role: AccessLevel,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, email: impl Into<String>, role: AccessLevel) -> Self {
        Self {
            user_id,
            email: email.into(),
            role,
            request_time: Utc::now(),
        }
    }

    /// Creates a context from verified token claims.
    pub fn from_claims(claims: &Claims) -> Self {
        Self::new(claims.sub, claims.email.clone(), claims.role)
    }
}
