// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain events derived from successful ingestion writes.
//!
//! Events are transient: they exist only for the duration of a dispatch call
//! and are never persisted. The closed set of variants maps one-to-one onto
//! the fixed wire names the dashboard listens for.

use crate::types::{MachineId, MachineStatus};

/// Name of the single live broadcast channel.
pub const CHANNEL: &str = "production-monitoring";

/// Wire names for the broadcast events.
pub mod event_names {
    /// A production reading was recorded.
    pub const DATA_UPDATED: &str = "machine.data.updated";
    /// A machine changed status.
    pub const STATUS_CHANGED: &str = "machine.status.changed";
    /// A temperature reading crossed the alert threshold.
    pub const ALERT_TRIGGERED: &str = "temperature.alert.triggered";
}

/// A domain event produced by the ingestion service.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainEvent {
    ProductionRecorded {
        machine_id: MachineId,
        machine_name: String,
        units_produced: i64,
        timestamp: String,
    },
    StatusChanged {
        machine_id: MachineId,
        machine_name: String,
        status: MachineStatus,
        previous_status: MachineStatus,
    },
    TemperatureAlertTriggered {
        machine_id: MachineId,
        machine_name: String,
        temperature: f64,
        timestamp: String,
    },
}

impl DomainEvent {
    /// The fixed wire name this event broadcasts as.
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::ProductionRecorded { .. } => event_names::DATA_UPDATED,
            DomainEvent::StatusChanged { .. } => event_names::STATUS_CHANGED,
            DomainEvent::TemperatureAlertTriggered { .. } => event_names::ALERT_TRIGGERED,
        }
    }

    /// The machine this event concerns.
    pub fn machine_id(&self) -> MachineId {
        match self {
            DomainEvent::ProductionRecorded { machine_id, .. }
            | DomainEvent::StatusChanged { machine_id, .. }
            | DomainEvent::TemperatureAlertTriggered { machine_id, .. } => *machine_id,
        }
    }
}
