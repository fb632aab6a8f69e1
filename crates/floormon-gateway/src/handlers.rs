// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the telemetry ingestion API.
//!
//! Exact paths and bodies are the compatibility boundary with producers:
//! `POST /api/machines/{machine}/production|temperature|status|operator`.
//! Validation failures are rejected here, before the ingestion service is
//! invoked.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use floormon_core::types::{parse_timestamp, MachineId, MachineStatus, OperatorId};
use floormon_core::FloormonError;

use crate::server::GatewayState;

/// Request body for POST .../production.
#[derive(Debug, Deserialize)]
pub struct ProductionRequest {
    pub units: i64,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Request body for POST .../temperature.
#[derive(Debug, Deserialize)]
pub struct TemperatureRequest {
    pub temperature: f64,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Request body for POST .../status.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

/// Request body for POST .../operator.
#[derive(Debug, Deserialize)]
pub struct OperatorRequest {
    #[serde(default)]
    pub operator_id: Option<OperatorId>,
}

/// Structured success envelope: `{success, message, data}`.
#[derive(Debug, Serialize)]
pub struct ApiSuccess<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

/// Structured failure envelope: `{success, message}`.
#[derive(Debug, Serialize)]
pub struct ApiFailure {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ProductionData {
    pub machine_id: MachineId,
    pub machine_name: String,
    pub units: i64,
}

#[derive(Debug, Serialize)]
pub struct TemperatureData {
    pub machine_id: MachineId,
    pub machine_name: String,
    pub temperature: f64,
}

#[derive(Debug, Serialize)]
pub struct StatusData {
    pub machine_id: MachineId,
    pub machine_name: String,
    pub status: MachineStatus,
}

#[derive(Debug, Serialize)]
pub struct OperatorData {
    pub machine_id: MachineId,
    pub machine_name: String,
    pub operator_id: Option<OperatorId>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

fn success<T: Serialize>(code: StatusCode, message: &str, data: T) -> Response {
    (
        code,
        Json(ApiSuccess {
            success: true,
            message: message.to_string(),
            data,
        }),
    )
        .into_response()
}

/// Map a service error onto the wire contract: 422 validation, 404 missing
/// machine/operator, 500 for storage and everything else (with a fixed
/// message, never internal detail).
pub(crate) fn failure(err: FloormonError, action: &str) -> Response {
    let (code, message) = match err {
        FloormonError::Validation(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
        FloormonError::NotFound { what, id } => {
            (StatusCode::NOT_FOUND, format!("{what} {id} not found"))
        }
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to {action}"),
        ),
    };
    (
        code,
        Json(ApiFailure {
            success: false,
            message,
        }),
    )
        .into_response()
}

/// Use the producer's timestamp when given, otherwise server-local now.
fn resolve_timestamp(raw: Option<&str>) -> Result<NaiveDateTime, FloormonError> {
    match raw {
        Some(s) => parse_timestamp(s),
        None => Ok(chrono::Local::now().naive_local()),
    }
}

/// POST /api/machines/{machine}/production
pub async fn record_production(
    State(state): State<GatewayState>,
    Path(machine): Path<MachineId>,
    Json(body): Json<ProductionRequest>,
) -> Response {
    let timestamp = match resolve_timestamp(body.timestamp.as_deref()) {
        Ok(ts) => ts,
        Err(e) => return failure(e, "record production data"),
    };

    match state.service.record_production(machine, body.units, timestamp).await {
        Ok(outcome) => success(
            StatusCode::CREATED,
            "Production data recorded successfully",
            ProductionData {
                machine_id: outcome.machine_id,
                machine_name: outcome.machine_name,
                units: outcome.units,
            },
        ),
        Err(e) => failure(e, "record production data"),
    }
}

/// POST /api/machines/{machine}/temperature
pub async fn record_temperature(
    State(state): State<GatewayState>,
    Path(machine): Path<MachineId>,
    Json(body): Json<TemperatureRequest>,
) -> Response {
    let timestamp = match resolve_timestamp(body.timestamp.as_deref()) {
        Ok(ts) => ts,
        Err(e) => return failure(e, "record temperature"),
    };

    match state
        .service
        .record_temperature(machine, body.temperature, timestamp)
        .await
    {
        Ok(outcome) => success(
            StatusCode::CREATED,
            "Temperature recorded successfully",
            TemperatureData {
                machine_id: outcome.machine_id,
                machine_name: outcome.machine_name,
                temperature: outcome.temperature,
            },
        ),
        Err(e) => failure(e, "record temperature"),
    }
}

/// POST /api/machines/{machine}/status
pub async fn update_status(
    State(state): State<GatewayState>,
    Path(machine): Path<MachineId>,
    Json(body): Json<StatusRequest>,
) -> Response {
    let new_status: MachineStatus = match body.status.parse() {
        Ok(status) => status,
        Err(_) => {
            return failure(
                FloormonError::Validation(format!(
                    "status must be one of running, idle, maintenance, warning; got `{}`",
                    body.status
                )),
                "update machine status",
            )
        }
    };

    match state.service.update_status(machine, new_status).await {
        Ok(outcome) => success(
            StatusCode::OK,
            "Machine status updated successfully",
            StatusData {
                machine_id: outcome.machine_id,
                machine_name: outcome.machine_name,
                status: outcome.status,
            },
        ),
        Err(e) => failure(e, "update machine status"),
    }
}

/// POST /api/machines/{machine}/operator
pub async fn update_operator(
    State(state): State<GatewayState>,
    Path(machine): Path<MachineId>,
    Json(body): Json<OperatorRequest>,
) -> Response {
    match state.service.update_operator(machine, body.operator_id).await {
        Ok(outcome) => success(
            StatusCode::OK,
            "Machine operator updated successfully",
            OperatorData {
                machine_id: outcome.machine_id,
                machine_name: outcome.machine_name,
                operator_id: outcome.operator_id,
            },
        ),
        Err(e) => failure(e, "update machine operator"),
    }
}

/// GET /health
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_request_deserializes_minimal() {
        let json = r#"{"units": 5}"#;
        let req: ProductionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.units, 5);
        assert!(req.timestamp.is_none());
    }

    #[test]
    fn production_request_deserializes_with_timestamp() {
        let json = r#"{"units": 5, "timestamp": "2024-01-01 10:00:00"}"#;
        let req: ProductionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.timestamp.as_deref(), Some("2024-01-01 10:00:00"));
    }

    #[test]
    fn operator_request_accepts_explicit_null() {
        let req: OperatorRequest = serde_json::from_str(r#"{"operator_id": null}"#).unwrap();
        assert!(req.operator_id.is_none());
        let req: OperatorRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert!(req.operator_id.is_none());
        let req: OperatorRequest = serde_json::from_str(r#"{"operator_id": 3}"#).unwrap();
        assert_eq!(req.operator_id, Some(3));
    }

    #[test]
    fn success_envelope_serializes() {
        let body = ApiSuccess {
            success: true,
            message: "Production data recorded successfully".to_string(),
            data: ProductionData {
                machine_id: 3,
                machine_name: "Mill 3".to_string(),
                units: 12,
            },
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("\"machine_id\":3"));
        assert!(json.contains("\"units\":12"));
    }

    #[test]
    fn failure_envelope_serializes() {
        let body = ApiFailure {
            success: false,
            message: "Failed to record production data".to_string(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"success\":false"));
    }

    #[test]
    fn resolve_timestamp_rejects_bad_format() {
        assert!(resolve_timestamp(Some("2024-01-01T10:00:00Z")).is_err());
        assert!(resolve_timestamp(Some("not a time")).is_err());
        assert!(resolve_timestamp(None).is_ok());
    }
}
