//! DocVault bootstrap
//!
//! Loads configuration, initializes logging, opens the credential store,
//! runs migrations and wires every service. The HTTP boundary is hosted
//! elsewhere; this process keeps the services alive until shutdown.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use docvault_auth::acl::PermissionResolver;
use docvault_auth::jwt::{JwtDecoder, JwtEncoder};
use docvault_auth::password::PasswordHasher;
use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_core::traits::ObjectStore;
use docvault_database::{
    AccountStore, DatabasePool, FileStore, FolderStore, PermissionStore, migration,
};
use docvault_service::{AuthService, FileService, FolderService};
use docvault_storage::LocalObjectStore;

/// Every service the boundary layer needs, ready to clone into handlers.
#[allow(dead_code)]
#[derive(Debug, Clone)]
struct AppServices {
    auth: AuthService,
    folders: FolderService,
    files: FileService,
    tokens: Arc<JwtDecoder>,
}

#[tokio::main]
async fn main() {
    let env = std::env::var("DOCVAULT_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "DocVault failed");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting DocVault v{}", env!("CARGO_PKG_VERSION"));

    if config.auth.jwt_secret == "CHANGE_ME_IN_PRODUCTION" {
        tracing::warn!("Using the default JWT secret; set DOCVAULT__AUTH__JWT_SECRET");
    }

    let db = DatabasePool::connect(&config.database).await?;
    db.ping().await?;
    if config.database.run_migrations {
        migration::run_migrations(db.pool()).await?;
    }

    let objects: Arc<dyn ObjectStore> =
        Arc::new(LocalObjectStore::new(&config.storage.local_root).await?);
    tracing::info!(
        provider = objects.provider_type(),
        root = %config.storage.local_root,
        "Object store ready"
    );

    let services = wire(&config, &db, objects)?;
    tracing::info!(?services, "DocVault services ready");

    shutdown_signal().await;
    tracing::info!("Shutdown signal received");

    db.close().await;
    tracing::info!("DocVault shut down gracefully");
    Ok(())
}

fn wire(
    config: &AppConfig,
    db: &DatabasePool,
    objects: Arc<dyn ObjectStore>,
) -> Result<AppServices, AppError> {
    let store = db.store();
    let accounts: Arc<dyn AccountStore> = Arc::new(store.accounts);
    let folders: Arc<dyn FolderStore> = Arc::new(store.folders);
    let files: Arc<dyn FileStore> = Arc::new(store.files);
    let permissions: Arc<dyn PermissionStore> = Arc::new(store.permissions);

    let resolver = Arc::new(PermissionResolver::new(
        folders.clone(),
        files.clone(),
        permissions.clone(),
    ));

    let auth = AuthService::new(
        accounts.clone(),
        Arc::new(PasswordHasher::new()),
        Arc::new(JwtEncoder::new(&config.auth)?),
        &config.auth,
    )?;

    let folder_service = FolderService::new(
        accounts.clone(),
        folders.clone(),
        files.clone(),
        permissions.clone(),
        objects.clone(),
        resolver.clone(),
    );

    let file_service = FileService::new(
        accounts,
        folders,
        files,
        permissions,
        objects,
        resolver,
        config.storage.max_upload_size_bytes,
    );

    Ok(AppServices {
        auth,
        folders: folder_service,
        files: file_service,
        tokens: Arc::new(JwtDecoder::new(&config.auth)),
    })
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
