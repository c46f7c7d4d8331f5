//! Configuration
//!
//! TigerStyle: Explicit configuration built once at startup and passed down.
//!
//! Nothing here is global. `main` parses the CLI (with environment fallbacks)
//! into an [`AppConfig`], validates it, and hands the [`StoreConfig`] half to
//! the storage selector.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

// =============================================================================
// TigerStyle Constants
// =============================================================================

/// Default HTTP bind address (all interfaces)
pub const HTTP_BIND_ADDRESS_DEFAULT: &str = "0.0.0.0:5000";

/// Default MongoDB connection string
pub const MONGO_URI_DEFAULT: &str = "mongodb://localhost:27017/";

/// Default MongoDB database name
pub const MONGO_DATABASE_DEFAULT: &str = "todo_db";

/// Default MongoDB collection name
pub const MONGO_COLLECTION_DEFAULT: &str = "items";

/// Default local fallback file
pub const ITEMS_FILE_DEFAULT: &str = "items.json";

/// Default startup probe timeout in milliseconds
pub const PROBE_TIMEOUT_MS_DEFAULT: u64 = 2_000;

/// Upper bound on the startup probe timeout in milliseconds
pub const PROBE_TIMEOUT_MS_MAX: u64 = 60_000;

// =============================================================================
// Types
// =============================================================================

/// Storage backend configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// MongoDB connection string to probe at startup
    pub mongo_uri: String,
    /// Database holding the items collection
    pub database: String,
    /// Items collection
    pub collection: String,
    /// JSON file used when MongoDB is unreachable
    pub items_file: PathBuf,
    /// How long the startup probe may take before falling back
    pub probe_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            mongo_uri: MONGO_URI_DEFAULT.to_string(),
            database: MONGO_DATABASE_DEFAULT.to_string(),
            collection: MONGO_COLLECTION_DEFAULT.to_string(),
            items_file: PathBuf::from(ITEMS_FILE_DEFAULT),
            probe_timeout: Duration::from_millis(PROBE_TIMEOUT_MS_DEFAULT),
        }
    }
}

impl StoreConfig {
    /// Config that only differs from the default in its fallback file
    pub fn with_items_file(items_file: impl Into<PathBuf>) -> Self {
        Self {
            items_file: items_file.into(),
            ..Self::default()
        }
    }

    /// Check the values make sense before anything connects
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::Empty("database"));
        }
        if self.collection.trim().is_empty() {
            return Err(ConfigError::Empty("collection"));
        }
        if self.items_file.as_os_str().is_empty() {
            return Err(ConfigError::Empty("items file"));
        }

        let probe_ms = self.probe_timeout.as_millis();
        if probe_ms == 0 || probe_ms > u128::from(PROBE_TIMEOUT_MS_MAX) {
            return Err(ConfigError::ProbeTimeout {
                ms: probe_ms,
                max: PROBE_TIMEOUT_MS_MAX,
            });
        }

        Ok(())
    }
}

/// Whole-process configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP bind address
    pub bind: SocketAddr,
    /// Development mode (verbose logging, request tracing)
    pub debug: bool,
    /// Storage settings
    pub store: StoreConfig,
}

impl AppConfig {
    /// Build and validate a config from raw CLI values
    pub fn new(bind: &str, debug: bool, store: StoreConfig) -> Result<Self, ConfigError> {
        let bind = bind.parse().map_err(|_| ConfigError::BindAddress(bind.to_string()))?;
        store.validate()?;

        Ok(Self { bind, debug, store })
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid bind address: {0}")]
    BindAddress(String),

    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("probe timeout must be between 1 and {max} ms, got {ms}")]
    ProbeTimeout { ms: u128, max: u64 },
}

// =============================================================================
// Tests
// =============================================================================
