//! Object storage configuration.

use serde::{Deserialize, Serialize};

/// Object storage configuration for uploaded file bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root path for the local filesystem object store.
    #[serde(default = "default_local_root")]
    pub local_root: String,
    /// Maximum upload size in bytes (default 100 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            local_root: default_local_root(),
            max_upload_size_bytes: default_max_upload(),
        }
    }
}

fn default_local_root() -> String {
    "./data/blobs".to_string()
}

fn default_max_upload() -> u64 {
    104_857_600 // 100 MB
}
