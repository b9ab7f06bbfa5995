//! Streaming file downloads.

use tracing::debug;

use docvault_auth::acl::AccessRequirement;
use docvault_core::error::AppError;
use docvault_core::traits::ByteStream;
use docvault_core::types::FileId;

use super::service::FileService;
use crate::context::RequestContext;

/// File content together with the metadata a client needs to save it.
pub struct FileDownload {
    /// Original file name.
    pub file_name: String,
    /// MIME type.
    pub content_type: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// File content.
    pub stream: ByteStream,
}

impl std::fmt::Debug for FileDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDownload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size_bytes", &self.size_bytes)
            .finish()
    }
}

impl FileService {
    /// Opens a live file for reading. Any resolvable access suffices.
    pub async fn download_file(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
    ) -> Result<FileDownload, AppError> {
        let file = self.load_live_file(file_id).await?;
        self.resolver
            .require_file_access(ctx.user_id, &file, AccessRequirement::Read)
            .await?;

        let stream = self.objects.download(&file.storage_key).await?;

        debug!(user_id = %ctx.user_id, file_id = %file_id, "File download started");

        Ok(FileDownload {
            file_name: file.name,
            content_type: file.content_type,
            size_bytes: file.size_bytes,
            stream,
        })
    }
}
