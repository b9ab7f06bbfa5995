//! Effective access resolution over the folder hierarchy.

pub mod checker;
pub mod resolver;

pub use checker::AccessRequirement;
pub use resolver::PermissionResolver;
