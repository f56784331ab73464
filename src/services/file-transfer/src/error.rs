use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use thiserror::Error;

/// Result type alias for file transfer operations
pub type FileTransferResult<T> = Result<T, FileTransferError>;

/// Main error type for the file transfer service
#[derive(Error, Debug)]
pub enum FileTransferError {
    // Client errors
    #[error("No files were uploaded")]
    NoFilesUploaded,

    #[error("Unexpected file field: {field}")]
    UnexpectedField { field: String },

    #[error("Malformed multipart request: {message}")]
    InvalidMultipart { message: String },

    #[error("File too large: {file_name} exceeds {max_size} bytes")]
    FileTooLarge { file_name: String, max_size: usize },

    #[error("Request body too large: {message}")]
    RequestTooLarge { message: String },

    #[error("File not found: {file_id}")]
    FileNotFound { file_id: String },

    // Storage errors
    #[error("IO error: {message}")]
    Io { message: String },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Error body returned by every API endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Error code for programmatic handling
    pub code: String,
    /// Timestamp of the error
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl FileTransferError {
    /// Convert error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            FileTransferError::NoFilesUploaded
            | FileTransferError::UnexpectedField { .. }
            | FileTransferError::InvalidMultipart { .. } => StatusCode::BAD_REQUEST,

            FileTransferError::FileTooLarge { .. } | FileTransferError::RequestTooLarge { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }

            FileTransferError::FileNotFound { .. } => StatusCode::NOT_FOUND,

            FileTransferError::Io { .. } | FileTransferError::Configuration { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            FileTransferError::NoFilesUploaded => "NO_FILES_UPLOADED",
            FileTransferError::UnexpectedField { .. } => "UNEXPECTED_FIELD",
            FileTransferError::InvalidMultipart { .. } => "INVALID_MULTIPART",
            FileTransferError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            FileTransferError::RequestTooLarge { .. } => "REQUEST_TOO_LARGE",
            FileTransferError::FileNotFound { .. } => "FILE_NOT_FOUND",
            FileTransferError::Io { .. } => "IO_ERROR",
            FileTransferError::Configuration { .. } => "CONFIGURATION_ERROR",
        }
    }

    /// Create error response for API
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            code: self.error_code().to_string(),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl IntoResponse for FileTransferError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (status, Json(self.to_error_response())).into_response()
    }
}

impl From<std::io::Error> for FileTransferError {
    fn from(err: std::io::Error) -> Self {
        FileTransferError::Io {
            message: err.to_string(),
        }
    }
}

impl From<MultipartError> for FileTransferError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            FileTransferError::RequestTooLarge {
                message: err.body_text(),
            }
        } else {
            FileTransferError::InvalidMultipart {
                message: err.body_text(),
            }
        }
    }
}

impl From<config::ConfigError> for FileTransferError {
    fn from(err: config::ConfigError) -> Self {
        FileTransferError::Configuration {
            message: err.to_string(),
        }
    }
}

impl FileTransferError {
    pub fn file_not_found<S: Into<String>>(file_id: S) -> Self {
        Self::FileNotFound {
            file_id: file_id.into(),
        }
    }

    pub fn file_too_large<S: Into<String>>(file_name: S, max_size: usize) -> Self {
        Self::FileTooLarge {
            file_name: file_name.into(),
            max_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            FileTransferError::NoFilesUploaded.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            FileTransferError::file_not_found("abc").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            FileTransferError::file_too_large("big.bin", 10).status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            FileTransferError::Io {
                message: "disk full".to_string()
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_response() {
        let response = FileTransferError::file_not_found("123-abc").to_error_response();

        assert_eq!(response.code, "FILE_NOT_FOUND");
        assert_eq!(response.error, "File not found: 123-abc");
    }
}
