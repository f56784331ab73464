//! FileFlow file transfer service
//!
//! A small LAN file drop: clients upload files over multipart HTTP, the
//! service stores them in a local directory, lists them from an in-memory
//! registry and deletes them on request.

pub mod config_types;
pub mod error;
pub mod handlers;
pub mod models;
pub mod registry;
pub mod resolver;
pub mod storage;
pub mod utils;


use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, SetRequestIdLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::info;

pub use config_types::FileTransferConfig;
pub use error::{FileTransferError, FileTransferResult};
pub use models::FileRecord;
pub use registry::FileRegistry;
pub use storage::DiskStore;

use handlers::{delete_file, health_check, list_files, upload_files};
use utils::path::DOWNLOAD_PREFIX;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<FileTransferConfig>,
    pub registry: Arc<FileRegistry>,
    pub store: Arc<DiskStore>,
}

impl AppState {
    /// Build state with an empty registry, creating the storage directory
    pub async fn new(config: FileTransferConfig) -> FileTransferResult<Self> {
        let store = DiskStore::new(config.storage.upload_dir.clone());
        store.ensure_root().await?;
        info!("Storage directory ready at {}", store.root().display());

        Ok(Self {
            config: Arc::new(config),
            registry: Arc::new(FileRegistry::new()),
            store: Arc::new(store),
        })
    }
}

/// Build the application router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let public_dir = state.config.storage.public_dir.clone();
    let upload_dir = state.store.root().to_path_buf();

    Router::new()
        .route_service("/", ServeFile::new(public_dir.join("index.html")))
        .route("/health", get(health_check))
        .route("/api/files", get(list_files))
        .route("/api/upload", post(upload_files))
        .route("/api/file/:id", delete(delete_file))
        .nest_service(DOWNLOAD_PREFIX, ServeDir::new(upload_dir))
        .fallback_service(ServeDir::new(public_dir))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(state.config.server.max_request_size)),
        )
        .with_state(state)
}
