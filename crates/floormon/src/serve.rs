// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `floormon serve` command implementation.
//!
//! Opens the SQLite store (running migrations), builds the broadcast bus and
//! ingestion service, and serves the gateway until interrupted. On shutdown
//! the WAL is checkpointed so a restart starts from a clean store.

use std::sync::Arc;

use tracing::info;

use floormon_bus::EventBus;
use floormon_config::model::FloormonConfig;
use floormon_core::FloormonError;
use floormon_gateway::{start_server, GatewayState};
use floormon_storage::Database;

/// Runs the `floormon serve` command.
pub async fn run_serve(config: FloormonConfig) -> Result<(), FloormonError> {
    info!("starting floormon serve");

    let db = Arc::new(
        Database::open_with_wal(&config.storage.database_path, config.storage.wal_mode).await?,
    );
    info!(path = config.storage.database_path.as_str(), "storage initialized");

    let bus = EventBus::default();
    let state = GatewayState::new(Arc::clone(&db), bus);

    let server_config = config.server.clone();
    let server = tokio::spawn(async move {
        if let Err(e) = start_server(&server_config, state).await {
            tracing::error!(error = %e, "gateway server error");
        }
    });

    // Serve until interrupted, then flush storage.
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| FloormonError::Internal(format!("signal handler failed: {e}")))?;
    info!("shutdown signal received");

    server.abort();
    db.close().await?;

    info!("floormon serve shutdown complete");
    Ok(())
}
