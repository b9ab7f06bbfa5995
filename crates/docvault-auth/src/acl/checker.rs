//! Access requirements checked against a resolved level.

use std::fmt;

use docvault_entity::permission::AccessLevel;

/// What an operation demands of the caller's effective level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRequirement {
    /// Any resolvable level.
    Read,
    /// Admin or Editor.
    Write,
    /// Exactly Admin.
    Admin,
}

impl AccessRequirement {
    /// Whether `level` satisfies this requirement. `None` never does.
    pub fn is_met_by(&self, level: Option<AccessLevel>) -> bool {
        match (self, level) {
            (_, None) => false,
            (Self::Read, Some(_)) => true,
            (Self::Write, Some(level)) => level.can_write(),
            (Self::Admin, Some(level)) => level.is_admin(),
        }
    }
}

impl fmt::Display for AccessRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
            Self::Admin => write!(f, "admin"),
        }
    }
}
