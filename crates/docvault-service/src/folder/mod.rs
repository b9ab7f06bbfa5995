//! Folder hierarchy operations and folder access management.

pub mod access;
pub mod service;

pub use service::{CreateFolderRequest, FolderService};
