//! Core traits defined in `docvault-core` and implemented by other crates.

pub mod object_store;

pub use object_store::{ByteStream, ObjectStore};
