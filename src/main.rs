//! crawlerd Binary Entry Point
//!
//! Runs the crawler API service. Core functionality is provided by the
//! `crawlerd` library crate. Lifecycle contract: the session manager is
//! initialized before the listener accepts a request and closed after the
//! listener drains.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use crawlerd::config::AppConfig;
use crawlerd::db::{crawler_schema, SessionManager};
use crawlerd::server::{create_router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// crawlerd - Crawler API Service
#[derive(Parser, Debug)]
#[command(name = "crawlerd", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "configs/config.yaml",
        env = "CRAWLERD_CONFIG"
    )]
    config: String,

    /// Server bind address (overrides config file)
    #[arg(long, env = "CRAWLERD_SERVER_BIND")]
    server_bind: Option<String>,

    /// Server port (overrides config file)
    #[arg(long, env = "CRAWLERD_SERVER_PORT")]
    server_port: Option<u16>,

    /// Database URL (overrides config-file settings entirely)
    #[arg(long, env = "CRAWLERD_DB_URL")]
    db_url: Option<String>,

    /// Create the crawler schema on startup (local/dev bootstrap only)
    #[arg(long)]
    bootstrap_schema: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,crawlerd=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("crawlerd - Crawler API Service");

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration from file
    tracing::info!("Loading configuration from: {}", cli.config);
    let mut config = AppConfig::load(&cli.config)?;

    // Apply CLI/env overrides (CLI > ENV > config file)
    if let Some(bind) = cli.server_bind {
        config.server.bind = bind;
    }
    if let Some(port) = cli.server_port {
        config.server.port = port;
    }

    let (db_url, redacted) = match cli.db_url {
        Some(url) => {
            let redacted = crawlerd::db::redact_url(&url);
            (url, redacted)
        }
        None => (config.database.url(), config.database.redacted_url()),
    };

    tracing::info!(
        "Server: {}:{}, Database: {}",
        config.server.bind,
        config.server.port,
        redacted,
    );

    // Initialize the session manager before serving any request
    let db = Arc::new(SessionManager::new());
    db.init(&db_url, config.database.engine_options()).await?;

    if cli.bootstrap_schema {
        let dialect = db.dialect().await?;
        let mut scope = db.connect().await?;
        db.create_all(&mut scope, &crawler_schema(dialect)).await?;
        scope.commit().await?;
        tracing::info!("Crawler schema bootstrapped");
    }

    // Create web server state
    let app_state = AppState { db: Arc::clone(&db) };

    // Build Axum router
    let app = create_router(app_state);

    // Parse bind address
    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;

    tracing::info!("Web server listening on: http://{}", addr);
    tracing::info!("Press Ctrl+C to shutdown");

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Dispose the engine after the last request completes
    tracing::info!("Shutting down database...");
    if let Err(e) = db.close().await {
        tracing::error!("Failed to close database: {}", e);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Setup graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal");
        }
    }
}
