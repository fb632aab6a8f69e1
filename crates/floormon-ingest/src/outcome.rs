// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Success outcomes returned by the ingestion operations.
//!
//! These carry the facts the transport layer echoes back to producers.

use floormon_core::types::{MachineId, MachineStatus, OperatorId};

/// Result of a successful production write.
#[derive(Debug, Clone)]
pub struct ProductionOutcome {
    pub machine_id: MachineId,
    pub machine_name: String,
    pub units: i64,
}

/// Result of a successful temperature write.
#[derive(Debug, Clone)]
pub struct TemperatureOutcome {
    pub machine_id: MachineId,
    pub machine_name: String,
    pub temperature: f64,
    pub alert_triggered: bool,
}

/// Result of a successful status update.
#[derive(Debug, Clone)]
pub struct StatusOutcome {
    pub machine_id: MachineId,
    pub machine_name: String,
    pub status: MachineStatus,
    pub previous_status: MachineStatus,
}

/// Result of a successful operator assignment.
#[derive(Debug, Clone)]
pub struct OperatorOutcome {
    pub machine_id: MachineId,
    pub machine_name: String,
    pub operator_id: Option<OperatorId>,
}
