// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Floormon crates.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::FloormonError;

/// Row id of a machine in the durable store.
pub type MachineId = i64;

/// Row id of an operator in the durable store.
pub type OperatorId = i64;

/// Timestamp wire format used by the HTTP API and stored in SQLite.
///
/// Kept as local-time text so SQLite `date()`/`strftime()` work on the
/// stored column directly.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a wire-format timestamp, rejecting anything else.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, FloormonError> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).map_err(|_| {
        FloormonError::Validation(format!(
            "timestamp `{s}` is not in YYYY-MM-DD HH:MM:SS format"
        ))
    })
}

/// The current server-local time in wire format.
pub fn now_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Kind of machine on the floor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum MachineType {
    #[strum(serialize = "CNC")]
    #[serde(rename = "CNC")]
    Cnc,
    Milling,
    Press,
    Assembly,
}

/// Operational status of a machine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MachineStatus {
    Running,
    Idle,
    Maintenance,
    Warning,
}

/// One of the three fixed daily shift periods used to bucket readings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ShiftType {
    Morning,
    Afternoon,
    Night,
}

impl ShiftType {
    /// Classify a reading timestamp into its shift.
    ///
    /// Morning 06:00-13:59, afternoon 14:00-21:59, night 22:00-05:59.
    pub fn for_timestamp(ts: &NaiveDateTime) -> ShiftType {
        match ts.hour() {
            6..=13 => ShiftType::Morning,
            14..=21 => ShiftType::Afternoon,
            _ => ShiftType::Night,
        }
    }
}

/// A machine record: the single authoritative mutable state per machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    pub id: MachineId,
    pub name: String,
    #[serde(rename = "type")]
    pub machine_type: MachineType,
    pub status: MachineStatus,
    pub current_operator_id: Option<OperatorId>,
    /// External topic identifier correlating inbound readings to the machine.
    pub topic_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// An operator who can be assigned to machines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operator {
    pub id: OperatorId,
    pub name: String,
    pub employee_id: String,
    pub shift_preference: Option<ShiftType>,
    pub created_at: String,
}

/// Immutable production fact, append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionReading {
    pub id: i64,
    pub machine_id: MachineId,
    pub units_produced: i64,
    pub recorded_at: String,
    pub shift_type: ShiftType,
}

/// Immutable temperature fact, append-only.
///
/// `alert_triggered` is computed at write time and never recomputed, so the
/// alert state of a historical reading survives threshold retuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub id: i64,
    pub machine_id: MachineId,
    pub temperature: f64,
    pub recorded_at: String,
    pub alert_triggered: bool,
}

/// Derived per-shift summary, at most one row per (machine, date, shift).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftAggregate {
    pub id: i64,
    pub machine_id: MachineId,
    pub shift_date: String,
    pub shift_type: ShiftType,
    pub total_units: i64,
    pub avg_temperature: Option<f64>,
    pub downtime_minutes: i64,
}
