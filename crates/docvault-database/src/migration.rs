//! Schema setup for the PostgreSQL credential store.
//!
//! The SQL files under `migrations/` at the workspace root create the
//! `access_level` enum and the accounts, folders, files and grant tables.
//! They are embedded at compile time, so the binary needs no migration files
//! on disk.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::{debug, info};

use docvault_core::error::{AppError, ErrorKind};

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Bring the credential store schema up to date.
///
/// Already applied versions are skipped; a checksum mismatch on one of them
/// fails with a database error.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    let known = MIGRATOR.iter().count();
    info!(known, "Applying credential store schema");

    for migration in MIGRATOR.iter() {
        debug!(version = migration.version, description = %migration.description, "Schema migration");
    }

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Credential store schema setup failed: {e}"),
            e,
        )
    })?;

    info!(known, "Credential store schema is current");
    Ok(())
}
