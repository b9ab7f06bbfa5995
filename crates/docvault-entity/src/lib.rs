//! # docvault-entity
//!
//! Domain entity models for DocVault. Every struct in this crate
//! represents a credential store row or a domain value object. Row types
//! derive `sqlx::FromRow` so the PostgreSQL repositories can map them
//! directly.

pub mod account;
pub mod file;
pub mod folder;
pub mod permission;
