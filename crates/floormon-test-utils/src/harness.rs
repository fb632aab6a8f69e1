// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the full ingestion stack on a temp SQLite
//! database: storage, bus, and ingestion service, with seeding helpers for
//! machines and operators. The temp directory lives as long as the harness.

use std::sync::Arc;

use floormon_bus::EventBus;
use floormon_core::types::{Machine, MachineStatus, MachineType, Operator, ShiftType};
use floormon_core::FloormonError;
use floormon_ingest::IngestService;
use floormon_storage::queries::{machines, operators};
use floormon_storage::Database;

/// A complete test environment with temp storage, bus, and service.
pub struct TestHarness {
    /// Shared database handle (temp file, cleaned up on drop).
    pub db: Arc<Database>,
    /// The broadcast bus the service publishes to.
    pub bus: EventBus,
    /// The ingestion service under test.
    pub service: IngestService,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a fresh environment on a unique temp database.
    pub async fn new() -> Result<Self, FloormonError> {
        let temp_dir = tempfile::TempDir::new()
            .map_err(|e| FloormonError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(Database::open(&db_path.to_string_lossy()).await?);
        let bus = EventBus::default();
        let service = IngestService::new(Arc::clone(&db), bus.clone());

        Ok(Self {
            db,
            bus,
            service,
            _temp_dir: temp_dir,
        })
    }

    /// Seed a machine with a generated unique topic id.
    pub async fn add_machine(
        &self,
        name: &str,
        machine_type: MachineType,
        status: MachineStatus,
    ) -> Result<Machine, FloormonError> {
        machines::create_machine(
            &self.db,
            machines::NewMachine {
                name: name.to_string(),
                machine_type,
                status,
                topic_id: format!("factory/{}", uuid::Uuid::new_v4()),
                current_operator_id: None,
            },
        )
        .await
    }

    /// Seed an operator.
    pub async fn add_operator(
        &self,
        name: &str,
        employee_id: &str,
        shift_preference: Option<ShiftType>,
    ) -> Result<Operator, FloormonError> {
        operators::create_operator(
            &self.db,
            operators::NewOperator {
                name: name.to_string(),
                employee_id: employee_id.to_string(),
                shift_preference,
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floormon_core::types::parse_timestamp;

    #[tokio::test]
    async fn harness_builds_working_environment() {
        let harness = TestHarness::new().await.unwrap();
        let machine = harness
            .add_machine("CNC 1", MachineType::Cnc, MachineStatus::Running)
            .await
            .unwrap();

        let outcome = harness
            .service
            .record_production(
                machine.id,
                5,
                parse_timestamp("2024-01-01 10:00:00").unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(outcome.units, 5);
    }

    #[tokio::test]
    async fn temp_db_is_unique_per_harness() {
        let h1 = TestHarness::new().await.unwrap();
        let h2 = TestHarness::new().await.unwrap();

        h1.add_machine("A", MachineType::Press, MachineStatus::Idle)
            .await
            .unwrap();

        let m1 = machines::list_machines(&h1.db).await.unwrap();
        let m2 = machines::list_machines(&h2.db).await.unwrap();
        assert_eq!(m1.len(), 1);
        assert_eq!(m2.len(), 0);
    }
}
