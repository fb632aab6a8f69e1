// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Machine CRUD operations (administrator path).
//!
//! Telemetry-driven mutations of machine state (status, operator) live in
//! [`crate::queries::readings`] and are reachable only through the ingestion
//! service.

use rusqlite::params;

use floormon_core::FloormonError;

use crate::database::{map_tr_err, Database};
use crate::models::{Machine, MachineId, MachineStatus, MachineType, OperatorId};

/// Input for creating a machine.
#[derive(Debug, Clone)]
pub struct NewMachine {
    pub name: String,
    pub machine_type: MachineType,
    pub status: MachineStatus,
    pub topic_id: String,
    pub current_operator_id: Option<OperatorId>,
}

/// Map a full machine row in SELECT column order.
pub(crate) fn machine_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Machine> {
    Ok(Machine {
        id: row.get(0)?,
        name: row.get(1)?,
        machine_type: parse_column(row, 2)?,
        status: parse_column(row, 3)?,
        current_operator_id: row.get(4)?,
        topic_id: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// Parse a TEXT column into a strum-backed enum.
pub(crate) fn parse_column<T>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = strum::ParseError>,
{
    let text: String = row.get(idx)?;
    text.parse().map_err(|e: strum::ParseError| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

const MACHINE_COLUMNS: &str =
    "id, name, type, status, current_operator_id, topic_id, created_at, updated_at";

/// Create a machine. Returns the stored row.
pub async fn create_machine(db: &Database, new: NewMachine) -> Result<Machine, FloormonError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO machines (name, type, status, current_operator_id, topic_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    new.name,
                    new.machine_type.to_string(),
                    new.status.to_string(),
                    new.current_operator_id,
                    new.topic_id,
                ],
            )?;
            let id = conn.last_insert_rowid();
            let machine = conn.query_row(
                &format!("SELECT {MACHINE_COLUMNS} FROM machines WHERE id = ?1"),
                params![id],
                machine_from_row,
            )?;
            Ok(machine)
        })
        .await
        .map_err(map_tr_err)
}

/// Get a machine by id.
pub async fn get_machine(
    db: &Database,
    id: MachineId,
) -> Result<Option<Machine>, FloormonError> {
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                &format!("SELECT {MACHINE_COLUMNS} FROM machines WHERE id = ?1"),
                params![id],
                machine_from_row,
            );
            match result {
                Ok(machine) => Ok(Some(machine)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// List all machines, oldest first.
pub async fn list_machines(db: &Database) -> Result<Vec<Machine>, FloormonError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn
                .prepare(&format!("SELECT {MACHINE_COLUMNS} FROM machines ORDER BY id ASC"))?;
            let rows = stmt.query_map([], machine_from_row)?;
            let mut machines = Vec::new();
            for row in rows {
                machines.push(row?);
            }
            Ok(machines)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a machine and (via FK cascade) its reading history.
///
/// Returns `false` if no machine with that id existed.
pub async fn delete_machine(db: &Database, id: MachineId) -> Result<bool, FloormonError> {
    db.connection()
        .call(move |conn| {
            let affected = conn.execute("DELETE FROM machines WHERE id = ?1", params![id])?;
            Ok(affected > 0)
        })
        .await
        .map_err(map_tr_err)
}
