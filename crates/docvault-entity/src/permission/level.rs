//! Access level enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Graded access on a folder or file, also used as an account's role.
///
/// Ordered by privilege: Admin > Editor > Viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "access_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Full control: manage grants, delete, edit, view.
    Admin,
    /// Create and edit content, but not manage grants.
    Editor,
    /// Read-only access.
    Viewer,
}

impl AccessLevel {
    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::Admin => 3,
            Self::Editor => 2,
            Self::Viewer => 1,
        }
    }

    /// Check if this level grants at least the given level's capabilities.
    pub fn has_at_least(&self, required: &AccessLevel) -> bool {
        self.privilege_level() >= required.privilege_level()
    }

    /// Check if this level allows creating content (Admin or Editor).
    pub fn can_write(&self) -> bool {
        self.has_at_least(&Self::Editor)
    }

    /// Check if this is exactly Admin, as destructive operations require.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the level as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
        }
    }
}

impl Default for AccessLevel {
    fn default() -> Self {
        Self::Viewer
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = docvault_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "editor" => Ok(Self::Editor),
            "viewer" => Ok(Self::Viewer),
            _ => Err(docvault_core::AppError::validation(format!(
                "Invalid access level: '{s}'. Expected one of: admin, editor, viewer"
            ))),
        }
    }
}
