// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire mapping from domain events to broadcast frames.
//!
//! Each variant of the closed event set maps to a fixed event name and field
//! schema. These names and fields are the contract the dashboard client
//! listens on; changing them breaks live updates.

use serde_json::{json, Value};

use floormon_core::event::CHANNEL;
use floormon_core::DomainEvent;

/// Build the broadcast frame for an event.
///
/// Envelope: `{"channel": "production-monitoring", "event": <name>,
/// "data": {...}}` with camelCase data fields.
pub fn frame(event: &DomainEvent) -> Value {
    let data = match event {
        DomainEvent::ProductionRecorded {
            machine_id,
            machine_name,
            units_produced,
            timestamp,
        } => json!({
            "machineId": machine_id,
            "machineName": machine_name,
            "unitsProduced": units_produced,
            "timestamp": timestamp,
        }),
        DomainEvent::StatusChanged {
            machine_id,
            machine_name,
            status,
            previous_status,
        } => json!({
            "machineId": machine_id,
            "machineName": machine_name,
            "status": status,
            "previousStatus": previous_status,
        }),
        DomainEvent::TemperatureAlertTriggered {
            machine_id,
            machine_name,
            temperature,
            timestamp,
        } => json!({
            "machineId": machine_id,
            "machineName": machine_name,
            "temperature": temperature,
            "timestamp": timestamp,
        }),
    };

    json!({
        "channel": CHANNEL,
        "event": event.name(),
        "data": data,
    })
}
