//! # CLI Server
//!
//! Server startup and management for the fieldserve CLI.

use std::net::SocketAddr;

use anyhow::anyhow;
use error::Result;
use migration::{Migrator, MigratorTrait as _};
use server::{notify::push::PushClient, settings::ServerSettings, AppState};
use tokio::net::TcpListener;
use tracing::info;

/// Starts the API server
///
/// Connects to the database, runs pending migrations, seeds the bootstrap
/// admin when configured, and serves the API until a shutdown signal.
///
/// # Arguments
///
/// * `args` - Serve command arguments
///
/// # Returns
///
/// A `Result` indicating success or failure.
pub async fn serve(args: &crate::commands::ServeArgs) -> Result<()> {
    info!(target: "serve", "Starting API server...");

    // Connect to database
    info!(target: "serve", "Connecting to database...");
    let db = migration::db::connect_from_env().await?;

    // Run migrations automatically on startup
    info!(target: "serve", "Running database migrations...");
    Migrator::up(&db, None)
        .await
        .map_err(|e| anyhow!("Failed to run database migrations: {}", e))?;
    info!(
        target: "serve",
        "Database migrations completed successfully"
    );

    // Seed the bootstrap admin when credentials are configured
    let created = migration::seeds::seed_bootstrap_admin(&db).await?;
    if created {
        info!(target: "serve", "Bootstrap admin account created");
    }

    // Push configuration comes from the environment; bind address comes
    // from the CLI arguments.
    let settings = ServerSettings::from_env();
    let push = PushClient::new(settings.push_endpoint, settings.push_api_key);
    if !push.is_enabled() {
        info!(target: "serve", "Push delivery is not configured; notifications are persisted only");
    }

    // Create application state
    let state = AppState { db, push };

    // Create the Axum router
    let app = server::create_app_router(state);

    // Parse the bind address
    let address: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|e| anyhow!("Invalid address {}:{}: {}", args.host, args.port, e))?;

    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| anyhow!("Failed to bind to {}: {}", address, e))?;

    info!(target: "serve", %address, "Starting HTTP server...");

    Ok(axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| anyhow!("HTTP server error: {}", e))?)
}

/// Waits for shutdown signals (Ctrl+C or SIGTERM)
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install terminate handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
