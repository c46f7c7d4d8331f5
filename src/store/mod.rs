//! Item Storage - Backend Trait and Implementations
//!
//! TigerStyle: One store interface, two backends, chosen once at startup.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ItemStore Trait                         │
//! └─────────────────────────────────────────────────────────────┘
//!          ↑                              ↑
//!          │                              │
//! ┌────────┴────────┐           ┌────────┴────────┐
//! │   MongoStore    │           │    FileStore    │
//! │    (remote)     │           │  (local JSON)   │
//! └─────────────────┘           └─────────────────┘
//!          ↑                              ↑
//!          └──────────── select_store ────┘
//! ```
//!
//! # Read policy
//!
//! `try_read_items` reports failures as [`StoreError`]. `read_items` is the
//! default policy on top of it: a failed read is logged and shown as an empty
//! list. Writes have no such policy; `add_item` errors reach the caller.

mod file;
#[cfg(feature = "mongo")]
mod mongo;
mod selector;

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;

use crate::item::Item;

pub use file::FileStore;
#[cfg(feature = "mongo")]
pub use mongo::MongoStore;
pub use selector::{select_store, SelectedStore};

// =============================================================================
// Types
// =============================================================================

/// Which backend serves reads and writes for this process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// MongoDB collection
    Remote,
    /// Local JSON file
    LocalFile,
}

impl Backend {
    /// Stable lowercase name for logs and JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::LocalFile => "local_file",
        }
    }

    /// Whether the document store is in use
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ItemStore Trait
// =============================================================================

/// Persistence for todo items
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Backend tag for this store
    fn backend(&self) -> Backend;

    /// Human-readable location (collection or file path)
    fn describe(&self) -> String;

    /// Read every item in insertion order, reporting failures
    async fn try_read_items(&self) -> StoreResult<Vec<Item>>;

    /// Read every item, treating any failure as an empty list
    async fn read_items(&self) -> Vec<Item> {
        match self.try_read_items().await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(
                    backend = %self.backend(),
                    location = %self.describe(),
                    error = %e,
                    "Read failed, showing empty list"
                );
                Vec::new()
            }
        }
    }

    /// Append one item, returning the backend-assigned id if there is one
    async fn add_item(&self, item: Item) -> StoreResult<Option<String>>;
}

// =============================================================================
// Errors
// =============================================================================

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("malformed items file {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("connection error: {0}")]
    Connection(String),

    #[error("backend error: {0}")]
    Backend(String),
}

// =============================================================================
// Tests
// =============================================================================
