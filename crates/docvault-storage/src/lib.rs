//! # docvault-storage
//!
//! [`ObjectStore`](docvault_core::traits::ObjectStore) implementations for
//! file contents: a local filesystem store for deployments and an
//! in-memory store for tests.

pub mod content_type;
pub mod providers;

pub use content_type::guess_content_type;
pub use providers::{LocalObjectStore, MemoryObjectStore};
