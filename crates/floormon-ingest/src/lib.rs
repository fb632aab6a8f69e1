// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telemetry ingestion service.
//!
//! [`IngestService`] is the transactional boundary between "a reading
//! arrived" and "state is durably updated and an event is on the wire". It
//! is the sole writer of telemetry facts: the gateway (and the tests) go
//! through it, never through raw storage writes, which is what keeps the
//! single-writer-path rule enforced by construction.
//!
//! Each operation performs exactly one atomic storage call (insert reading,
//! derive flags, upsert aggregate), then publishes the derived domain event
//! after the write has committed. A caller observing success is therefore
//! guaranteed the event was handed to the dispatcher; dispatch itself is
//! fire-and-forget and can never fail or roll back the write.

pub mod outcome;

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{error, info, warn};

use floormon_bus::EventBus;
use floormon_core::types::{MachineId, MachineStatus, OperatorId, TIMESTAMP_FORMAT};
use floormon_core::{DomainEvent, FloormonError};
use floormon_storage::queries::readings;
use floormon_storage::Database;

pub use outcome::{OperatorOutcome, ProductionOutcome, StatusOutcome, TemperatureOutcome};

/// Inclusive bounds on units per production reading.
pub const UNITS_RANGE: std::ops::RangeInclusive<i64> = 1..=1000;

/// Inclusive bounds on a temperature reading in degrees Celsius.
pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=200.0;

/// The telemetry ingestion service.
#[derive(Clone)]
pub struct IngestService {
    db: Arc<Database>,
    bus: EventBus,
}

impl IngestService {
    pub fn new(db: Arc<Database>, bus: EventBus) -> Self {
        Self { db, bus }
    }

    /// The bus this service publishes to, for wiring up subscribers.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Record a production reading.
    ///
    /// Atomically appends the reading and folds its units into the matching
    /// shift aggregate, then publishes `machine.data.updated`.
    pub async fn record_production(
        &self,
        machine_id: MachineId,
        units: i64,
        timestamp: NaiveDateTime,
    ) -> Result<ProductionOutcome, FloormonError> {
        if !UNITS_RANGE.contains(&units) {
            return Err(FloormonError::Validation(format!(
                "units must be between 1 and 1000, got {units}"
            )));
        }

        let write = readings::record_production(&self.db, machine_id, units, timestamp)
            .await
            .inspect_err(|e| {
                error!(machine_id, units, error = %e, "failed to record production data");
            })?;

        let Some(write) = write else {
            warn!(machine_id, units, "production reading for unknown machine");
            return Err(FloormonError::NotFound {
                what: "machine",
                id: machine_id,
            });
        };

        info!(machine_id, units, "production data recorded");

        self.bus.publish(&DomainEvent::ProductionRecorded {
            machine_id,
            machine_name: write.machine_name.clone(),
            units_produced: units,
            timestamp: timestamp.format(TIMESTAMP_FORMAT).to_string(),
        });

        Ok(ProductionOutcome {
            machine_id,
            machine_name: write.machine_name,
            units,
        })
    }

    /// Record a temperature reading.
    ///
    /// The alert rule is evaluated inside the same atomic write that stores
    /// the reading; when it trips, exactly one `temperature.alert.triggered`
    /// is published for this reading. Readings at or below the threshold
    /// publish nothing.
    pub async fn record_temperature(
        &self,
        machine_id: MachineId,
        temperature: f64,
        timestamp: NaiveDateTime,
    ) -> Result<TemperatureOutcome, FloormonError> {
        if !TEMPERATURE_RANGE.contains(&temperature) {
            return Err(FloormonError::Validation(format!(
                "temperature must be between 0 and 200, got {temperature}"
            )));
        }

        let write = readings::record_temperature(&self.db, machine_id, temperature, timestamp)
            .await
            .inspect_err(|e| {
                error!(machine_id, temperature, error = %e, "failed to record temperature");
            })?;

        let Some(write) = write else {
            warn!(machine_id, temperature, "temperature reading for unknown machine");
            return Err(FloormonError::NotFound {
                what: "machine",
                id: machine_id,
            });
        };

        if write.alert_triggered {
            warn!(machine_id, temperature, "temperature alert triggered");
            self.bus.publish(&DomainEvent::TemperatureAlertTriggered {
                machine_id,
                machine_name: write.machine_name.clone(),
                temperature,
                timestamp: timestamp.format(TIMESTAMP_FORMAT).to_string(),
            });
        }

        Ok(TemperatureOutcome {
            machine_id,
            machine_name: write.machine_name,
            temperature,
            alert_triggered: write.alert_triggered,
        })
    }

    /// Change a machine's status, returning the previous value.
    ///
    /// Publishes `machine.status.changed` unconditionally, including no-op
    /// transitions where the new status equals the old one.
    pub async fn update_status(
        &self,
        machine_id: MachineId,
        new_status: MachineStatus,
    ) -> Result<StatusOutcome, FloormonError> {
        let write = readings::update_status(&self.db, machine_id, new_status)
            .await
            .inspect_err(|e| {
                error!(machine_id, status = %new_status, error = %e, "failed to update machine status");
            })?;

        let Some(write) = write else {
            warn!(machine_id, status = %new_status, "status update for unknown machine");
            return Err(FloormonError::NotFound {
                what: "machine",
                id: machine_id,
            });
        };

        info!(
            machine_id,
            status = %new_status,
            previous_status = %write.previous_status,
            "machine status updated"
        );

        self.bus.publish(&DomainEvent::StatusChanged {
            machine_id,
            machine_name: write.machine_name.clone(),
            status: new_status,
            previous_status: write.previous_status,
        });

        Ok(StatusOutcome {
            machine_id,
            machine_name: write.machine_name,
            status: new_status,
            previous_status: write.previous_status,
        })
    }

    /// Assign (or clear) the machine's operator.
    ///
    /// Pure state change; this path publishes no domain event.
    pub async fn update_operator(
        &self,
        machine_id: MachineId,
        operator_id: Option<OperatorId>,
    ) -> Result<OperatorOutcome, FloormonError> {
        let write = readings::update_operator(&self.db, machine_id, operator_id)
            .await
            .inspect_err(|e| {
                error!(machine_id, ?operator_id, error = %e, "failed to update machine operator");
            })?;

        match write {
            readings::OperatorWrite::Updated { machine_name } => {
                info!(machine_id, ?operator_id, "machine operator updated");
                Ok(OperatorOutcome {
                    machine_id,
                    machine_name,
                    operator_id,
                })
            }
            readings::OperatorWrite::MachineMissing => {
                warn!(machine_id, "operator update for unknown machine");
                Err(FloormonError::NotFound {
                    what: "machine",
                    id: machine_id,
                })
            }
            readings::OperatorWrite::OperatorMissing => {
                warn!(machine_id, ?operator_id, "assignment of unknown operator");
                Err(FloormonError::NotFound {
                    what: "operator",
                    id: operator_id.unwrap_or_default(),
                })
            }
        }
    }
}
