use std::path::PathBuf;

use config::Config;
use serde::{Deserialize, Serialize};

use crate::error::FileTransferResult;

/// Main configuration structure for the file transfer service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileTransferConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage directory configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum size of a whole request body in bytes
    #[serde(default = "default_max_request_size")]
    pub max_request_size: usize,
}

/// Storage directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding uploaded files, served under `/downloads`
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    /// Directory holding the landing page and its assets
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
    /// Maximum size of a single uploaded file in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Fallback filter when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of compact text
    #[serde(default = "default_false")]
    pub json_format: bool,
}

impl FileTransferConfig {
    /// Load configuration from the optional config file and the environment.
    ///
    /// Sources are layered in order: built-in defaults, the config file
    /// (`config/file-transfer` unless `path` is given), then
    /// `FILE_TRANSFER__SECTION__KEY` environment variables.
    pub fn load(path: Option<&str>) -> FileTransferResult<Self> {
        let settings = Config::builder()
            .add_source(
                config::File::with_name(path.unwrap_or("config/file-transfer")).required(false),
            )
            .add_source(config::Environment::with_prefix("FILE_TRANSFER").separator("__"))
            .build()?;

        Ok(settings.try_deserialize::<FileTransferConfig>()?)
    }

    /// Configuration rooted at the given directories, used by tests and embedders
    pub fn with_dirs(upload_dir: impl Into<PathBuf>, public_dir: impl Into<PathBuf>) -> Self {
        let mut config = Self::default();
        config.storage.upload_dir = upload_dir.into();
        config.storage.public_dir = public_dir.into();
        config
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_request_size() -> usize {
    1024 * 1024 * 1024 // 1GiB
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("./uploads")
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("./public")
}

fn default_max_file_size() -> usize {
    100 * 1024 * 1024 // 100MiB
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_false() -> bool {
    false
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_request_size: default_max_request_size(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            public_dir: default_public_dir(),
            max_file_size: default_max_file_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: default_false(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FileTransferConfig::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.storage.max_file_size, 100 * 1024 * 1024);
        assert_eq!(config.storage.upload_dir, PathBuf::from("./uploads"));
    }

    #[test]
    fn test_load_without_sources_uses_defaults() {
        let config = FileTransferConfig::load(Some("config/does-not-exist")).unwrap();

        assert_eq!(config.storage.public_dir, PathBuf::from("./public"));
        assert!(!config.logging.json_format);
    }
}
