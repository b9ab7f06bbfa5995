//! # docvault-service
//!
//! Use-case layer of the vault. Each service orchestrates the credential
//! store, the object store and the auth primitives to implement one
//! family of operations.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time as `Arc` references, so every service is cheap to
//! clone and safe to share across tasks.

pub mod auth;
pub mod context;
pub mod file;
pub mod folder;

pub use auth::AuthService;
pub use context::RequestContext;
pub use file::FileService;
pub use folder::FolderService;
