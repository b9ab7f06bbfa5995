//! Object store contract for uploaded file bytes.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for reading blob contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Blob storage for file contents, addressed by an opaque storage key.
///
/// The trait lives in `docvault-core`; implementations live in
/// `docvault-storage`.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g. `"local"`, `"memory"`).
    fn provider_type(&self) -> &str;

    /// Store `data` under `key`, overwriting any previous blob, and return
    /// a locator for the stored object.
    async fn upload(&self, key: &str, data: Bytes) -> AppResult<String>;

    /// Open the blob stored under `key`.
    ///
    /// Fails with `NotFound` when no blob exists.
    async fn download(&self, key: &str) -> AppResult<ByteStream>;

    /// Remove the blob stored under `key`.
    ///
    /// Returns `false` when nothing was stored; a missing blob is not an
    /// error at this layer.
    async fn delete(&self, key: &str) -> AppResult<bool>;
}
