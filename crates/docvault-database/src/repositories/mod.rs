//! PostgreSQL implementations of the credential store traits.

pub mod account;
pub mod file;
pub mod folder;
pub mod permission;

pub use account::AccountRepository;
pub use file::FileRepository;
pub use folder::FolderRepository;
pub use permission::PermissionRepository;

use sqlx::PgPool;

use docvault_core::error::{AppError, ErrorKind};

/// One repository per store trait, sharing a single pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    /// Account repository.
    pub accounts: AccountRepository,
    /// Folder repository.
    pub folders: FolderRepository,
    /// Permission repository.
    pub permissions: PermissionRepository,
    /// File repository.
    pub files: FileRepository,
}

impl PgStore {
    /// Build every repository over the same pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            accounts: AccountRepository::new(pool.clone()),
            folders: FolderRepository::new(pool.clone()),
            permissions: PermissionRepository::new(pool.clone()),
            files: FileRepository::new(pool),
        }
    }
}

/// Map a write error, turning unique violations into conflicts.
pub(crate) fn map_write_error(e: sqlx::Error, conflict: &str, context: &str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::conflict(conflict)
        }
        _ => AppError::with_source(ErrorKind::Database, context, e),
    }
}
