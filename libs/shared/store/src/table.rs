use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// One JSON-backed table with read-all / write-all semantics.
///
/// Every mutation loads the full snapshot, changes it in memory and writes
/// the whole file back. This assumes a single writer; two concurrent writers
/// can overwrite each other's changes. Callers serialize access themselves.
pub struct TableStore<T> {
    path: PathBuf,
    _row: PhantomData<T>,
}

impl<T> TableStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _row: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every row. A missing or unreadable file yields an empty table
    /// rather than an error.
    pub async fn get_all(&self) -> Vec<T> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(_) => {
                debug!("table {} absent, treating as empty", self.path.display());
                return Vec::new();
            }
        };

        match serde_json::from_slice(&raw) {
            Ok(rows) => rows,
            Err(e) => {
                warn!("table {} unreadable ({}), treating as empty", self.path.display(), e);
                Vec::new()
            }
        }
    }

    /// Write the full snapshot back, creating parent directories as needed.
    pub async fn replace_all(&self, rows: &[T]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let json = serde_json::to_vec_pretty(rows)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("writing {}", self.path.display()))?;

        debug!("wrote {} rows to {}", rows.len(), self.path.display());
        Ok(())
    }

    pub async fn append(&self, row: T) -> Result<()> {
        let mut rows = self.get_all().await;
        rows.push(row);
        self.replace_all(&rows).await
    }

    /// Apply `mutate` to every row matching `matches`; returns how many rows
    /// changed. Nothing is written when no row matches.
    pub async fn update_where<P, F>(&self, matches: P, mut mutate: F) -> Result<usize>
    where
        P: Fn(&T) -> bool,
        F: FnMut(&mut T),
    {
        let mut rows = self.get_all().await;
        let mut updated = 0;
        for row in rows.iter_mut() {
            if matches(row) {
                mutate(row);
                updated += 1;
            }
        }

        if updated > 0 {
            self.replace_all(&rows).await?;
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: u64,
        note: String,
    }

    #[tokio::test]
    async fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store: TableStore<Row> = TableStore::new(dir.path().join("none.json"));
        assert!(store.get_all().await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, b"{ not json").unwrap();
        let store: TableStore<Row> = TableStore::new(path);
        assert!(store.get_all().await.is_empty());
    }

    #[tokio::test]
    async fn append_then_update_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store: TableStore<Row> = TableStore::new(dir.path().join("rows.json"));

        store.append(Row { id: 1, note: "a".into() }).await.unwrap();
        store.append(Row { id: 2, note: "b".into() }).await.unwrap();

        let changed = store
            .update_where(|r| r.id == 2, |r| r.note = "changed".into())
            .await
            .unwrap();
        assert_eq!(changed, 1);

        let rows = store.get_all().await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].note, "changed");
    }

    #[tokio::test]
    async fn update_without_match_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        let store: TableStore<Row> = TableStore::new(path.clone());
        let changed = store
            .update_where(|r| r.id == 9, |r| r.note.clear())
            .await
            .unwrap();
        assert_eq!(changed, 0);
        assert!(!path.exists());
    }
}
