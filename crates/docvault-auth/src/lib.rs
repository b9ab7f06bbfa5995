//! # docvault-auth
//!
//! Credential primitives and access resolution for the vault.
//!
//! ## Modules
//!
//! - `password`: HMAC-SHA512 password hashing and policy enforcement
//! - `jwt`: access token issuance and verification, opaque refresh tokens
//! - `acl`: effective permission resolution up the folder tree

pub mod acl;
pub mod jwt;
pub mod password;

pub use acl::{AccessRequirement, PermissionResolver};
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
