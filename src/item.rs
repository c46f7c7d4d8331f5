//! Todo Items
//!
//! TigerStyle: A todo entry is a required name plus an optional description.
//!
//! Items are immutable once created. Both storage backends persist them with
//! the same camelCase keys (`itemName`, `itemDescription`), so a file written
//! by one deployment reads the same as documents inserted by another.

use serde::{Deserialize, Serialize};

// =============================================================================
// Types
// =============================================================================

/// A todo entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Item name (never empty for items created through `Item::new`)
    pub item_name: String,
    /// Optional free-form description
    #[serde(default)]
    pub item_description: Option<String>,
}

impl Item {
    /// Create a new item, rejecting a missing or empty name
    pub fn new(
        item_name: Option<String>,
        item_description: Option<String>,
    ) -> Result<Self, ItemError> {
        let item_name = item_name
            .filter(|name| !name.is_empty())
            .ok_or(ItemError::NameRequired)?;

        Ok(Self {
            item_name,
            item_description,
        })
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Item validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    #[error("itemName required")]
    NameRequired,
}

// =============================================================================
// Tests
// =============================================================================
