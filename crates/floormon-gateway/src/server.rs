// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use floormon_bus::EventBus;
use floormon_config::model::ServerConfig;
use floormon_core::FloormonError;
use floormon_ingest::IngestService;
use floormon_storage::Database;

use crate::{admin, handlers, ws};

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The ingestion service: the only write path for telemetry.
    pub service: IngestService,
    /// Read-side database handle for dashboard and report queries.
    pub db: Arc<Database>,
    /// Broadcast bus forwarded to WebSocket subscribers.
    pub bus: EventBus,
}

impl GatewayState {
    pub fn new(db: Arc<Database>, bus: EventBus) -> Self {
        Self {
            service: IngestService::new(Arc::clone(&db), bus.clone()),
            db,
            bus,
        }
    }
}

/// Build the full gateway router.
///
/// Routes:
/// - `POST /api/machines/{machine}/production|temperature|status|operator`
/// - `GET/POST /api/machines`, `GET/DELETE /api/machines/{machine}`
/// - `GET/POST /api/operators`
/// - `GET /api/dashboard`, `GET /api/reports/production.csv`
/// - `GET /ws` (live event stream), `GET /health`
pub fn router(state: GatewayState) -> Router {
    let telemetry_routes = Router::new()
        .route(
            "/api/machines/{machine}/production",
            post(handlers::record_production),
        )
        .route(
            "/api/machines/{machine}/temperature",
            post(handlers::record_temperature),
        )
        .route(
            "/api/machines/{machine}/status",
            post(handlers::update_status),
        )
        .route(
            "/api/machines/{machine}/operator",
            post(handlers::update_operator),
        );

    let admin_routes = Router::new()
        .route(
            "/api/machines",
            get(admin::list_machines).post(admin::create_machine),
        )
        .route(
            "/api/machines/{machine}",
            get(admin::get_machine).delete(admin::delete_machine),
        )
        .route(
            "/api/operators",
            get(admin::list_operators).post(admin::create_operator),
        )
        .route("/api/dashboard", get(admin::dashboard))
        .route("/api/reports/production.csv", get(admin::production_report));

    Router::new()
        .merge(telemetry_routes)
        .merge(admin_routes)
        .route("/ws", get(ws::ws_handler))
        .route("/health", get(handlers::get_health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the gateway HTTP/WebSocket server and serve until the task is
/// aborted.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
) -> Result<(), FloormonError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| FloormonError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| FloormonError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn gateway_state_is_clone() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("state.db");
        let db = Arc::new(Database::open(db_path.to_str().unwrap()).await.unwrap());
        let state = GatewayState::new(db, EventBus::default());
        let _cloned = state.clone();
    }
}
