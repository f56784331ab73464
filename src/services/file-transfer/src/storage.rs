//! Storage directory access
//!
//! Files are created with exclusive-create semantics: a candidate name is
//! taken only if the create call itself succeeds, so two concurrent uploads
//! can never end up writing the same file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::{self, File, OpenOptions};
use tracing::{debug, info, warn};

use crate::{error::FileTransferResult, models::StoredFile, resolver::NameCandidates};

/// Local directory holding uploaded file bytes
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, stored_name: &str) -> PathBuf {
        self.root.join(stored_name)
    }

    /// Create the storage directory if it is missing
    pub async fn ensure_root(&self) -> FileTransferResult<()> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Exclusively create the first free candidate for `name`.
    ///
    /// Returns the open file and the name it was created under.
    pub async fn create_unique(&self, name: &str) -> FileTransferResult<(File, String)> {
        self.ensure_root().await?;

        let mut candidates = NameCandidates::new(name);
        loop {
            let candidate = candidates.next_candidate();
            // An empty name resolves to the storage directory itself
            if candidate.is_empty() {
                continue;
            }

            let result = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.path_for(&candidate))
                .await;

            match result {
                Ok(file) => {
                    if candidate != name {
                        debug!("Name {:?} taken, storing as {:?}", name, candidate);
                    }
                    return Ok((file, candidate));
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Best-effort unlink of a stored file; failures are only logged
    pub async fn remove(&self, stored_name: &str) -> bool {
        match fs::remove_file(self.path_for(stored_name)).await {
            Ok(()) => {
                info!("Deleted stored file {}", stored_name);
                true
            }
            Err(err) => {
                warn!("Failed to delete stored file {}: {}", stored_name, err);
                false
            }
        }
    }

    /// Remove every file written by a failed upload request
    pub async fn discard(&self, files: &[StoredFile]) {
        for file in files {
            self.remove(&file.stored_name).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn test_create_unique_suffixes_collisions() {
        let dir = tempdir().unwrap();
        let store = DiskStore::new(dir.path());

        let (_, first) = store.create_unique("a.txt").await.unwrap();
        let (_, second) = store.create_unique("a.txt").await.unwrap();
        let (_, third) = store.create_unique("a.txt").await.unwrap();

        assert_eq!(first, "a.txt");
        assert_eq!(second, "a(1).txt");
        assert_eq!(third, "a(2).txt");
        assert!(store.path_for("a(2).txt").exists());
    }

    #[tokio::test]
    async fn test_create_unique_never_overwrites() {
        let dir = tempdir().unwrap();
        let store = DiskStore::new(dir.path());
        std::fs::write(dir.path().join("notes.md"), b"original").unwrap();

        let (mut file, name) = store.create_unique("notes.md").await.unwrap();
        file.write_all(b"new").await.unwrap();
        file.flush().await.unwrap();

        assert_eq!(name, "notes(1).md");
        assert_eq!(std::fs::read(dir.path().join("notes.md")).unwrap(), b"original");
        assert_eq!(std::fs::read(dir.path().join(&name)).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_create_unique_skips_directory_names() {
        let dir = tempdir().unwrap();
        let store = DiskStore::new(dir.path());

        let (_, empty) = store.create_unique("").await.unwrap();
        let (_, dots) = store.create_unique("..").await.unwrap();

        assert_eq!(empty, "(1)");
        assert_eq!(dots, "..(1)");
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_names() {
        let dir = tempdir().unwrap();
        let store = DiskStore::new(dir.path());

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.create_unique("same.bin").await.unwrap().1 })
            })
            .collect();

        let mut names = Vec::new();
        for task in tasks {
            names.push(task.await.unwrap());
        }
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 8);
    }

    #[tokio::test]
    async fn test_ensure_root_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let store = DiskStore::new(dir.path().join("nested").join("uploads"));

        store.ensure_root().await.unwrap();
        assert!(store.root().is_dir());
    }

    #[tokio::test]
    async fn test_remove_is_best_effort() {
        let dir = tempdir().unwrap();
        let store = DiskStore::new(dir.path());
        let (_, name) = store.create_unique("gone.txt").await.unwrap();

        assert!(store.remove(&name).await);
        assert!(!store.path_for(&name).exists());
        assert!(!store.remove(&name).await);
    }
}
