//! # devmgmtd — device management daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Install the `tracing` subscriber
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct the document store, the remote location client and the
//!   filesystem readers (adapters)
//! - Load the bundled datasets into an empty store
//! - Build the axum router and serve until SIGTERM/SIGINT
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use devmgmt_adapter_fs::{FsDatasets, FsVersionSource};
use devmgmt_adapter_http_axum::state::AppState;
use devmgmt_adapter_location_http::HttpLocationApi;
use devmgmt_adapter_storage_sqlite_sqlx::SqliteDocumentStore;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Database
    let db = devmgmt_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let store = SqliteDocumentStore::new(db.pool().clone());

    // Remote location API
    let remote: Option<HttpLocationApi> = match &config.location_api.base_url {
        Some(base_url) => {
            let api = devmgmt_adapter_location_http::Config {
                base_url: base_url.clone(),
                token: config.location_api.token.clone(),
                timeout: config.location_api_timeout(),
            }
            .build()?;
            tracing::info!(url = api.url(), "remote location API enabled");
            Some(api)
        }
        None => {
            tracing::info!("no remote location API configured, serving local data only");
            None
        }
    };

    // Services
    let state = AppState::new(
        store,
        remote,
        FsVersionSource::new(&config.device.version_file),
        config.producer(),
    );

    // Bundled datasets
    let datasets = FsDatasets::new(&config.device.data_dir);
    match state.location_service.bootstrap(&datasets).await {
        Ok(count) => tracing::info!(count, "location bootstrap finished"),
        Err(err) => tracing::error!(error = %err, "location bootstrap failed"),
    }
    match state.resource_bundle_service.bootstrap(&datasets).await {
        Ok(count) => tracing::info!(count, "resource bundle bootstrap finished"),
        Err(err) => tracing::error!(error = %err, "resource bundle bootstrap failed"),
    }

    // HTTP
    let app = devmgmt_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "devmgmtd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("devmgmtd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "unable to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "unable to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
