//! MongoStore - Remote Document Storage
//!
//! TigerStyle: Items live one-per-document in a MongoDB collection.
//!
//! `connect` doubles as the startup probe: it pings the server with the
//! configured timeout and only hands back a store once the ping succeeds.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    options::ClientOptions,
    Client, Collection,
};

use super::{Backend, ItemStore, StoreError, StoreResult};
use crate::config::StoreConfig;
use crate::item::Item;

/// MongoDB storage backend
pub struct MongoStore {
    collection: Collection<Item>,
    database_name: String,
    collection_name: String,
}

impl MongoStore {
    /// Connect and ping the server, failing if it cannot be reached in time
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(&config.mongo_uri)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        options.server_selection_timeout = Some(config.probe_timeout);
        options.connect_timeout = Some(config.probe_timeout);

        let client =
            Client::with_options(options).map_err(|e| StoreError::Connection(e.to_string()))?;

        let database = client.database(&config.database);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self {
            collection: database.collection::<Item>(&config.collection),
            database_name: config.database.clone(),
            collection_name: config.collection.clone(),
        })
    }
}

/// Projection that keeps MongoDB's `_id` out of listed items
fn item_projection() -> Document {
    doc! { "_id": 0 }
}

/// Render an inserted id as the string handed back to callers
fn inserted_id_string(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s,
        other => other.to_string(),
    }
}

#[async_trait]
impl ItemStore for MongoStore {
    fn backend(&self) -> Backend {
        Backend::Remote
    }

    fn describe(&self) -> String {
        format!("{}.{}", self.database_name, self.collection_name)
    }

    async fn try_read_items(&self) -> StoreResult<Vec<Item>> {
        let cursor = self
            .collection
            .find(doc! {})
            .projection(item_projection())
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        cursor
            .try_collect::<Vec<Item>>()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn add_item(&self, item: Item) -> StoreResult<Option<String>> {
        let result = self
            .collection
            .insert_one(&item)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let id = inserted_id_string(result.inserted_id);

        tracing::debug!(
            collection = %self.describe(),
            id = %id,
            "Inserted item"
        );

        Ok(Some(id))
    }
}

// =============================================================================
// Tests
// =============================================================================
