//! File upload, download, soft delete and file-level grants.

pub mod download;
pub mod service;

pub use download::FileDownload;
pub use service::{FileDeleteResponse, FileService, UploadFileRequest, UploadFileResponse};

use tracing::warn;

use docvault_core::traits::ObjectStore;
use docvault_entity::file::FileRecord;

/// Removes the blobs of tombstoned files, logging instead of failing.
pub(crate) async fn remove_blobs(objects: &dyn ObjectStore, files: &[FileRecord]) {
    for file in files {
        match objects.delete(&file.storage_key).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(file_id = %file.id, key = %file.storage_key, "Blob already missing");
            }
            Err(e) => {
                warn!(file_id = %file.id, key = %file.storage_key, error = %e, "Failed to remove blob");
            }
        }
    }
}
