//! Registration, login and refresh-token rotation.

pub mod service;

pub use service::{AuthService, RegisterRequest, RegisterResponse, TokenResponse};
