use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::{id, path, size, time};

/// Metadata for one uploaded file, as listed by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Unique record identifier
    pub id: String,
    /// Decoded original filename shown to users
    #[serde(rename = "name")]
    pub display_name: String,
    /// Human-readable size, frozen at upload time
    #[serde(rename = "size")]
    pub size_label: String,
    /// Upload timestamp label, frozen at upload time
    #[serde(rename = "uploadTime")]
    pub upload_time_label: String,
    /// Collision-resolved filename in the storage directory
    #[serde(rename = "filename")]
    pub stored_name: String,
    /// URL path the stored file is served from
    #[serde(rename = "path")]
    pub download_path: String,
}

impl FileRecord {
    /// Create a record for a file that has just been written to disk
    pub fn new(display_name: String, stored_name: String, size_bytes: u64) -> Self {
        Self {
            id: id::generate_file_id(),
            display_name,
            size_label: size::format_file_size(size_bytes),
            upload_time_label: time::current_upload_time_label(),
            download_path: path::download_path(&stored_name),
            stored_name,
        }
    }
}

/// A file part that has been streamed to the storage directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub display_name: String,
    pub stored_name: String,
    pub size_bytes: u64,
}

impl From<StoredFile> for FileRecord {
    fn from(file: StoredFile) -> Self {
        FileRecord::new(file.display_name, file.stored_name, file.size_bytes)
    }
}

/// Upload response
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    /// Full registry after the upload
    pub files: Vec<FileRecord>,
}

/// Plain message response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub files: usize,
}
