//! HTTP request handlers for the file transfer service

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::{
    error::{FileTransferError, FileTransferResult},
    models::{FileRecord, HealthResponse, MessageResponse, StoredFile, UploadResponse},
    resolver, AppState,
};

/// Multipart field that carries uploaded files
pub const UPLOAD_FIELD: &str = "files";

/// List all uploaded files in upload order
pub async fn list_files(State(state): State<AppState>) -> Json<Vec<FileRecord>> {
    Json(state.registry.list().await)
}

/// Upload one or more files from the `files` multipart field
pub async fn upload_files(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> FileTransferResult<Json<UploadResponse>> {
    let mut stored = Vec::new();

    if let Err(err) = receive_files(&state, &mut multipart, &mut stored).await {
        if !stored.is_empty() {
            warn!(
                "Upload failed, discarding {} file(s) from this request: {}",
                stored.len(),
                err
            );
            state.store.discard(&stored).await;
        }
        return Err(err);
    }

    if stored.is_empty() {
        return Err(FileTransferError::NoFilesUploaded);
    }

    let count = stored.len();
    state
        .registry
        .append_all(stored.into_iter().map(FileRecord::from))
        .await;

    info!("Successfully uploaded {} file(s)", count);

    Ok(Json(UploadResponse {
        message: format!("Successfully uploaded {} file(s)", count),
        files: state.registry.list().await,
    }))
}

/// Stream every file part to disk, recording each file as soon as it exists
async fn receive_files(
    state: &AppState,
    multipart: &mut Multipart,
    stored: &mut Vec<StoredFile>,
) -> FileTransferResult<()> {
    let max_file_size = state.config.storage.max_file_size;

    while let Some(mut field) = multipart.next_field().await? {
        // Plain text fields are ignored
        let Some(raw_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        let field_name = field.name().unwrap_or_default().to_string();
        if field_name != UPLOAD_FIELD {
            return Err(FileTransferError::UnexpectedField { field: field_name });
        }

        let display_name = resolver::display_name(&raw_name);
        let (mut file, stored_name) = state.store.create_unique(&display_name).await?;
        stored.push(StoredFile {
            display_name: display_name.clone(),
            stored_name: stored_name.clone(),
            size_bytes: 0,
        });

        let mut size = 0usize;
        while let Some(chunk) = field.chunk().await? {
            size += chunk.len();
            if size > max_file_size {
                return Err(FileTransferError::file_too_large(display_name, max_file_size));
            }
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        if let Some(last) = stored.last_mut() {
            last.size_bytes = size as u64;
        }

        info!("Stored upload {} -> {} ({} bytes)", display_name, stored_name, size);
    }

    Ok(())
}

/// Delete a file by record id
pub async fn delete_file(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> FileTransferResult<Json<MessageResponse>> {
    let record = state
        .registry
        .remove_by_id(&file_id)
        .await
        .ok_or_else(|| FileTransferError::file_not_found(file_id.as_str()))?;

    // Unlink failures are logged by the store and never reach the client
    state.store.remove(&record.stored_name).await;

    info!("Deleted file {} ({})", record.display_name, record.id);

    Ok(Json(MessageResponse {
        message: "File deleted".to_string(),
    }))
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        files: state.registry.len().await,
    };

    (StatusCode::OK, Json(response))
}
