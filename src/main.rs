//! Todo App binary
//!
//! Parses configuration, picks the storage backend once, and serves HTTP.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use todo_app::config::{
    HTTP_BIND_ADDRESS_DEFAULT, ITEMS_FILE_DEFAULT, MONGO_COLLECTION_DEFAULT,
    MONGO_DATABASE_DEFAULT, MONGO_URI_DEFAULT, PROBE_TIMEOUT_MS_DEFAULT,
};
use todo_app::{AppConfig, AppState, StoreConfig, APP_NAME, APP_VERSION};

// =============================================================================
// CLI
// =============================================================================

/// Minimal todo list web app
#[derive(Parser, Debug)]
#[command(name = APP_NAME)]
#[command(about = "Todo list web app with MongoDB storage and a local file fallback")]
#[command(version)]
struct Cli {
    /// HTTP bind address
    #[arg(short, long, env = "TODO_BIND", default_value = HTTP_BIND_ADDRESS_DEFAULT)]
    bind: String,

    /// MongoDB connection string probed at startup
    #[arg(long, env = "MONGO_URI", default_value = MONGO_URI_DEFAULT)]
    mongo_uri: String,

    /// MongoDB database name
    #[arg(long, env = "TODO_DATABASE", default_value = MONGO_DATABASE_DEFAULT)]
    database: String,

    /// MongoDB collection name
    #[arg(long, env = "TODO_COLLECTION", default_value = MONGO_COLLECTION_DEFAULT)]
    collection: String,

    /// JSON file used when MongoDB is unreachable
    #[arg(long, env = "TODO_ITEMS_FILE", default_value = ITEMS_FILE_DEFAULT)]
    items_file: String,

    /// Startup probe timeout in milliseconds
    #[arg(long, env = "TODO_PROBE_TIMEOUT_MS", default_value_t = PROBE_TIMEOUT_MS_DEFAULT)]
    probe_timeout_ms: u64,

    /// Development mode (debug logging, request tracing)
    #[arg(long, env = "TODO_DEBUG", default_value_t = true, action = clap::ArgAction::Set)]
    debug: bool,

    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap reads environment fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let filter = match (cli.verbose, cli.debug) {
        (0, false) => "info",
        (0, true) => "debug,tower_http=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .init();

    tracing::info!("Todo App v{}", APP_VERSION);

    let store = StoreConfig {
        mongo_uri: cli.mongo_uri,
        database: cli.database,
        collection: cli.collection,
        items_file: PathBuf::from(shellexpand::tilde(&cli.items_file).to_string()),
        probe_timeout: Duration::from_millis(cli.probe_timeout_ms),
    };
    let config = AppConfig::new(&cli.bind, cli.debug, store)?;

    // Selected once; never re-probed
    let selected = todo_app::select_store(&config.store).await;

    tracing::info!(
        bind = %config.bind,
        backend = %selected.backend(),
        debug = config.debug,
        "Starting HTTP server"
    );

    let app = todo_app::router(AppState::new(selected));
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
