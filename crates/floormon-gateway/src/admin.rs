// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Administrator endpoints: machine/operator CRUD, dashboard snapshot, and
//! the CSV production report.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use floormon_core::types::{MachineId, MachineStatus, MachineType, OperatorId, ShiftType};
use floormon_core::FloormonError;
use floormon_storage::queries::{dashboard, machines, operators};
use floormon_storage::report;

use crate::handlers::failure;
use crate::server::GatewayState;

/// Request body for POST /api/machines.
#[derive(Debug, Deserialize)]
pub struct CreateMachineRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub machine_type: String,
    #[serde(default)]
    pub status: Option<String>,
    pub topic_id: String,
    #[serde(default)]
    pub current_operator_id: Option<OperatorId>,
}

/// Request body for POST /api/operators.
#[derive(Debug, Deserialize)]
pub struct CreateOperatorRequest {
    pub name: String,
    pub employee_id: String,
    #[serde(default)]
    pub shift_preference: Option<String>,
}

fn parse_enum<T>(value: &str, expected: &str) -> Result<T, FloormonError>
where
    T: std::str::FromStr,
{
    value.parse().map_err(|_| {
        FloormonError::Validation(format!("{expected}; got `{value}`"))
    })
}

/// POST /api/machines
pub async fn create_machine(
    State(state): State<GatewayState>,
    Json(body): Json<CreateMachineRequest>,
) -> Response {
    let machine_type: MachineType = match parse_enum(
        &body.machine_type,
        "type must be one of CNC, Milling, Press, Assembly",
    ) {
        Ok(t) => t,
        Err(e) => return failure(e, "create machine"),
    };
    let status: MachineStatus = match body.status.as_deref() {
        Some(raw) => match parse_enum(
            raw,
            "status must be one of running, idle, maintenance, warning",
        ) {
            Ok(s) => s,
            Err(e) => return failure(e, "create machine"),
        },
        None => MachineStatus::Idle,
    };
    if body.name.trim().is_empty() {
        return failure(
            FloormonError::Validation("name must not be empty".to_string()),
            "create machine",
        );
    }

    let new = machines::NewMachine {
        name: body.name,
        machine_type,
        status,
        topic_id: body.topic_id,
        current_operator_id: body.current_operator_id,
    };
    match machines::create_machine(&state.db, new).await {
        Ok(machine) => (StatusCode::CREATED, Json(machine)).into_response(),
        Err(e) => failure(e, "create machine"),
    }
}

/// GET /api/machines
pub async fn list_machines(State(state): State<GatewayState>) -> Response {
    match machines::list_machines(&state.db).await {
        Ok(all) => Json(all).into_response(),
        Err(e) => failure(e, "list machines"),
    }
}

/// GET /api/machines/{machine}
pub async fn get_machine(
    State(state): State<GatewayState>,
    Path(machine): Path<MachineId>,
) -> Response {
    match machines::get_machine(&state.db, machine).await {
        Ok(Some(m)) => Json(m).into_response(),
        Ok(None) => failure(
            FloormonError::NotFound {
                what: "machine",
                id: machine,
            },
            "get machine",
        ),
        Err(e) => failure(e, "get machine"),
    }
}

/// DELETE /api/machines/{machine}
///
/// Cascades the machine's reading history.
pub async fn delete_machine(
    State(state): State<GatewayState>,
    Path(machine): Path<MachineId>,
) -> Response {
    match machines::delete_machine(&state.db, machine).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => failure(
            FloormonError::NotFound {
                what: "machine",
                id: machine,
            },
            "delete machine",
        ),
        Err(e) => failure(e, "delete machine"),
    }
}

/// POST /api/operators
pub async fn create_operator(
    State(state): State<GatewayState>,
    Json(body): Json<CreateOperatorRequest>,
) -> Response {
    let shift_preference: Option<ShiftType> = match body.shift_preference.as_deref() {
        Some(raw) => match parse_enum(
            raw,
            "shift_preference must be one of morning, afternoon, night",
        ) {
            Ok(s) => Some(s),
            Err(e) => return failure(e, "create operator"),
        },
        None => None,
    };

    let new = operators::NewOperator {
        name: body.name,
        employee_id: body.employee_id,
        shift_preference,
    };
    match operators::create_operator(&state.db, new).await {
        Ok(operator) => (StatusCode::CREATED, Json(operator)).into_response(),
        Err(e) => failure(e, "create operator"),
    }
}

/// GET /api/operators
pub async fn list_operators(State(state): State<GatewayState>) -> Response {
    match operators::list_operators(&state.db).await {
        Ok(all) => Json(all).into_response(),
        Err(e) => failure(e, "list operators"),
    }
}

/// GET /api/dashboard
///
/// The aggregation view: machines with their latest readings plus
/// floor-wide stats, recomputed from stored readings on every call.
pub async fn dashboard(State(state): State<GatewayState>) -> Response {
    let now = chrono::Local::now().naive_local();
    match dashboard::snapshot(&state.db, now).await {
        Ok(snap) => Json(snap).into_response(),
        Err(e) => failure(e, "load dashboard"),
    }
}

/// GET /api/reports/production.csv
pub async fn production_report(State(state): State<GatewayState>) -> Response {
    match report::production_report_csv(&state.db).await {
        Ok(csv_bytes) => {
            let filename = format!(
                "production-report-{}.csv",
                chrono::Local::now().format("%Y-%m-%d")
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{filename}\""),
                    ),
                ],
                csv_bytes,
            )
                .into_response()
        }
        Err(e) => failure(e, "export production report"),
    }
}
