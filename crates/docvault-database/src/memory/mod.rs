//! In-process credential store.

mod store;

pub use store::MemoryStore;
