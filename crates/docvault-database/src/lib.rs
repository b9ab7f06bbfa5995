//! # docvault-database
//!
//! The credential store contract used by the vault services, with a
//! PostgreSQL implementation backed by sqlx and an in-memory
//! implementation for tests and embedders.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use repositories::PgStore;
pub use store::{AccountStore, FileStore, FolderStore, PermissionStore};
