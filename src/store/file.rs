//! FileStore - Local JSON Fallback
//!
//! TigerStyle: The whole list lives in one JSON array, rewritten on every add.
//!
//! Writes are read-modify-write over the full file, replaced atomically via a
//! sibling `.tmp` file and a rename, so readers never see a half-written
//! list. The in-process mutex covers every write, including creating the
//! empty file on first read; another process writing the same file can still
//! lose updates.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use super::{Backend, ItemStore, StoreError, StoreResult};
use crate::item::Item;

/// Suffix of the scratch file written before each rename
const TEMP_FILE_SUFFIX: &str = ".tmp";

/// JSON file storage backend
#[derive(Debug)]
pub struct FileStore {
    /// Path of the JSON array file
    path: PathBuf,
    /// Serializes every write within this process
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a store over `path`; the file is created lazily on first read
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Parse the file, or `None` if it does not exist yet
    async fn load(&self) -> StoreResult<Option<Vec<Item>>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Malformed {
                path: self.path.clone(),
                source,
            })
    }

    /// Replace the file with `items`. Callers must hold `write_lock`.
    async fn save(&self, items: &[Item]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut temp_name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        temp_name.push(TEMP_FILE_SUFFIX);
        let temp_path = self.path.with_file_name(temp_name);

        let bytes = serde_json::to_vec_pretty(items)?;
        fs::write(&temp_path, &bytes).await?;
        fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ItemStore for FileStore {
    fn backend(&self) -> Backend {
        Backend::LocalFile
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn try_read_items(&self) -> StoreResult<Vec<Item>> {
        if let Some(items) = self.load().await? {
            return Ok(items);
        }

        let _guard = self.write_lock.lock().await;

        // An add may have created the file while we waited for the lock
        if let Some(items) = self.load().await? {
            return Ok(items);
        }

        self.save(&[]).await?;
        tracing::info!(path = %self.path.display(), "Created empty items file");
        Ok(Vec::new())
    }

    async fn add_item(&self, item: Item) -> StoreResult<Option<String>> {
        let _guard = self.write_lock.lock().await;

        let mut items = match self.load().await {
            Ok(Some(items)) => items,
            Ok(None) => Vec::new(),
            Err(e @ StoreError::Malformed { .. }) => {
                tracing::warn!(error = %e, "Replacing malformed items file");
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        items.push(item);
        self.save(&items).await?;

        tracing::debug!(
            path = %self.path.display(),
            count = items.len(),
            "Stored item in file"
        );

        Ok(None)
    }
}

// =============================================================================
// Tests
// =============================================================================
