//! Todo App - Minimal Todo List Web Application
//!
//! A small web app that stores todo items in MongoDB when it is reachable
//! at startup, and in a local JSON file when it is not.
//!
//! Features:
//! - One-time backend selection with a bounded startup probe
//! - `ItemStore` trait with MongoDB and JSON-file implementations
//! - HTML list page and form submission endpoint
//! - Health check reporting the active backend

pub mod config;
pub mod item;
pub mod store;
pub mod web;

pub use config::{AppConfig, ConfigError, StoreConfig};
pub use item::{Item, ItemError};
pub use store::{select_store, Backend, FileStore, ItemStore, SelectedStore, StoreError, StoreResult};
pub use web::{router, AppState};

/// Application name
pub const APP_NAME: &str = "todo-app";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
