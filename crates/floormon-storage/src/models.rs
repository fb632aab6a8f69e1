// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `floormon-core::types` for use across
//! crate boundaries. This module re-exports them for convenience within the
//! storage crate.

pub use floormon_core::types::{
    Machine, MachineId, MachineStatus, MachineType, Operator, OperatorId, ProductionReading,
    ShiftAggregate, ShiftType, TemperatureReading,
};
