//! Access levels and explicit permission grants.

pub mod level;
pub mod model;

pub use level::AccessLevel;
pub use model::{FilePermission, FolderPermission};
