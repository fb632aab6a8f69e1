// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Floormon factory monitoring service.
//!
//! This crate provides the error type, domain types (machines, readings,
//! shifts), the temperature alert rule, and the domain event definitions
//! shared by the storage, ingestion, bus, and gateway crates.

pub mod alert;
pub mod error;
pub mod event;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use alert::{alert_triggered, ALERT_THRESHOLD};
pub use error::FloormonError;
pub use event::DomainEvent;
pub use types::{MachineId, MachineStatus, MachineType, OperatorId, ShiftType};
