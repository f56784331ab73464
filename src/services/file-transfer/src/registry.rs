//! In-memory file registry
//!
//! Holds upload metadata in upload order for the lifetime of the process.

use tokio::sync::RwLock;

use crate::models::FileRecord;

/// Ordered, lock-guarded list of uploaded files
#[derive(Debug, Default)]
pub struct FileRegistry {
    records: RwLock<Vec<FileRecord>>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record at the end; ids are not checked for uniqueness
    pub async fn append(&self, record: FileRecord) {
        self.records.write().await.push(record);
    }

    /// Add several records in one critical section, keeping their order
    pub async fn append_all(&self, records: impl IntoIterator<Item = FileRecord>) {
        self.records.write().await.extend(records);
    }

    /// Snapshot of all records in upload order
    pub async fn list(&self) -> Vec<FileRecord> {
        self.records.read().await.clone()
    }

    /// Remove the first record with the given id.
    ///
    /// Returns the removed record, or `None` when no record matches; the list
    /// is left untouched in that case.
    pub async fn remove_by_id(&self, id: &str) -> Option<FileRecord> {
        let mut records = self.records.write().await;
        let index = records.iter().position(|record| record.id == id)?;
        Some(records.remove(index))
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(name: &str) -> FileRecord {
        FileRecord::new(name.to_string(), name.to_string(), 10)
    }

    #[tokio::test]
    async fn test_append_then_list() {
        let registry = FileRegistry::new();
        let first = record("a.txt");
        let second = record("b.txt");

        registry.append(first.clone()).await;
        registry.append(second.clone()).await;

        let listed = registry.list().await;
        assert_eq!(listed.last(), Some(&second));
        assert_eq!(listed, vec![first, second]);
    }

    #[tokio::test]
    async fn test_remove_by_id() {
        let registry = FileRegistry::new();
        let first = record("a.txt");
        let second = record("b.txt");
        registry.append_all([first.clone(), second.clone()]).await;

        let removed = registry.remove_by_id(&first.id).await;
        assert_eq!(removed, Some(first.clone()));
        assert_eq!(registry.list().await, vec![second.clone()]);

        // Removing again reports not found
        assert!(registry.remove_by_id(&first.id).await.is_none());
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove_unknown_id_leaves_list_unchanged() {
        let registry = FileRegistry::new();
        registry.append(record("a.txt")).await;
        let before = registry.list().await;

        assert!(registry.remove_by_id("no-such-id").await.is_none());
        assert_eq!(registry.list().await, before);
    }

    #[tokio::test]
    async fn test_remove_takes_first_duplicate_id() {
        let registry = FileRegistry::new();
        let first = record("a.txt");
        let mut duplicate = record("b.txt");
        duplicate.id = first.id.clone();
        registry.append_all([first.clone(), duplicate.clone()]).await;

        assert_eq!(registry.remove_by_id(&first.id).await, Some(first));
        assert_eq!(registry.list().await, vec![duplicate]);
    }
}
