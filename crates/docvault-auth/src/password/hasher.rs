//! HMAC-SHA512 password hashing and verification.
//!
//! A fresh random salt is generated per password and used as the HMAC key;
//! the digest is the MAC of the password bytes.

use hmac::{Hmac, Mac};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha512;

use docvault_core::error::AppError;

type HmacSha512 = Hmac<Sha512>;

/// Salt length in bytes (the SHA-512 block size).
pub const SALT_LEN: usize = 128;

/// Digest length in bytes.
pub const DIGEST_LEN: usize = 64;

/// Handles password hashing and verification using keyed HMAC-SHA512.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hashes a plaintext password with a newly generated salt.
    ///
    /// Returns `(digest, salt)`.
    pub fn hash_password(&self, password: &str) -> Result<(Vec<u8>, Vec<u8>), AppError> {
        let mut salt = vec![0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);

        let mut mac = HmacSha512::new_from_slice(&salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
        mac.update(password.as_bytes());

        Ok((mac.finalize().into_bytes().to_vec(), salt))
    }

    /// Verifies a plaintext password against a stored digest and salt.
    ///
    /// The comparison is constant-time. Any mismatch, including a digest of
    /// the wrong length, yields `false`.
    pub fn verify_password(&self, password: &str, digest: &[u8], salt: &[u8]) -> bool {
        let Ok(mut mac) = HmacSha512::new_from_slice(salt) else {
            return false;
        };
        mac.update(password.as_bytes());
        mac.verify_slice(digest).is_ok()
    }
}
