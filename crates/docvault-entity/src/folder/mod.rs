//! Folder domain entities.

pub mod model;
pub mod tree;

pub use model::{CreateFolder, Folder, FolderView};
pub use tree::{FolderArena, FolderChanges};
