// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Atomic telemetry write operations.
//!
//! Each operation is one `call` closure containing one SQLite transaction:
//! insert the reading, derive its flags, and upsert the matching shift
//! aggregate as a single unit. Combined with the single background write
//! thread this rules out lost updates between concurrent writes for the
//! same machine.
//!
//! These functions are reachable only through `floormon-ingest`; no other
//! component may mutate telemetry state.

use chrono::NaiveDateTime;
use rusqlite::params;

use floormon_core::alert::alert_triggered;
use floormon_core::types::{MachineStatus, OperatorId, ShiftAggregate, ShiftType, TIMESTAMP_FORMAT};
use floormon_core::FloormonError;

use crate::database::{map_tr_err, Database};
use crate::models::MachineId;
use crate::queries::machines::parse_column;

/// SQL expression deriving the shift of a `recorded_at` column, mirroring
/// [`ShiftType::for_timestamp`]. Keeps shift-window queries derivable from
/// raw readings without a stored shift column on temperature logs.
const SHIFT_OF_RECORDED_AT: &str = "CASE
    WHEN CAST(strftime('%H', recorded_at) AS INTEGER) BETWEEN 6 AND 13 THEN 'morning'
    WHEN CAST(strftime('%H', recorded_at) AS INTEGER) BETWEEN 14 AND 21 THEN 'afternoon'
    ELSE 'night'
 END";

/// Outcome of an atomic production write.
#[derive(Debug, Clone)]
pub struct ProductionWrite {
    pub machine_name: String,
}

/// Outcome of an atomic temperature write.
#[derive(Debug, Clone)]
pub struct TemperatureWrite {
    pub machine_name: String,
    pub alert_triggered: bool,
}

/// Outcome of an atomic status write.
#[derive(Debug, Clone)]
pub struct StatusWrite {
    pub machine_name: String,
    pub previous_status: MachineStatus,
}

/// Outcome of an operator assignment write.
#[derive(Debug, Clone)]
pub enum OperatorWrite {
    Updated { machine_name: String },
    MachineMissing,
    OperatorMissing,
}

/// Append a production reading and fold it into the shift aggregate.
///
/// Returns `None` when the machine does not exist (nothing is written).
pub async fn record_production(
    db: &Database,
    machine_id: MachineId,
    units: i64,
    recorded_at: NaiveDateTime,
) -> Result<Option<ProductionWrite>, FloormonError> {
    let shift_type = ShiftType::for_timestamp(&recorded_at).to_string();
    let shift_date = recorded_at.date().to_string();
    let timestamp = recorded_at.format(TIMESTAMP_FORMAT).to_string();

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let machine = tx.query_row(
                "SELECT name FROM machines WHERE id = ?1",
                params![machine_id],
                |row| row.get::<_, String>(0),
            );
            let machine_name = match machine {
                Ok(name) => name,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                Err(e) => return Err(e.into()),
            };

            tx.execute(
                "INSERT INTO production_data (machine_id, units_produced, recorded_at, shift_type)
                 VALUES (?1, ?2, ?3, ?4)",
                params![machine_id, units, timestamp, shift_type],
            )?;

            tx.execute(
                "INSERT INTO production_shifts (machine_id, shift_date, shift_type, total_units)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (machine_id, shift_date, shift_type)
                 DO UPDATE SET
                     total_units = total_units + excluded.total_units,
                     updated_at = strftime('%Y-%m-%d %H:%M:%S', 'now', 'localtime')",
                params![machine_id, shift_date, shift_type, units],
            )?;

            tx.commit()?;
            Ok(Some(ProductionWrite { machine_name }))
        })
        .await
        .map_err(map_tr_err)
}

/// Append a temperature reading, evaluate the alert rule, and refresh the
/// shift aggregate's average temperature.
///
/// The alert flag is computed here, inside the same transaction that stores
/// it, and returned to the caller for event dispatch. Returns `None` when
/// the machine does not exist.
pub async fn record_temperature(
    db: &Database,
    machine_id: MachineId,
    temperature: f64,
    recorded_at: NaiveDateTime,
) -> Result<Option<TemperatureWrite>, FloormonError> {
    let shift_type = ShiftType::for_timestamp(&recorded_at).to_string();
    let shift_date = recorded_at.date().to_string();
    let timestamp = recorded_at.format(TIMESTAMP_FORMAT).to_string();
    let alert = alert_triggered(temperature);

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let machine = tx.query_row(
                "SELECT name FROM machines WHERE id = ?1",
                params![machine_id],
                |row| row.get::<_, String>(0),
            );
            let machine_name = match machine {
                Ok(name) => name,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                Err(e) => return Err(e.into()),
            };

            tx.execute(
                "INSERT INTO temperature_logs (machine_id, temperature, recorded_at, alert_triggered)
                 VALUES (?1, ?2, ?3, ?4)",
                params![machine_id, temperature, timestamp, alert],
            )?;

            // Recompute the shift average from the raw readings of the same
            // (machine, date, shift) window, including the row just inserted.
            tx.execute(
                &format!(
                    "INSERT INTO production_shifts (machine_id, shift_date, shift_type, avg_temperature)
                     VALUES (?1, ?2, ?3,
                         (SELECT AVG(temperature) FROM temperature_logs
                           WHERE machine_id = ?1
                             AND date(recorded_at) = ?2
                             AND {SHIFT_OF_RECORDED_AT} = ?3))
                     ON CONFLICT (machine_id, shift_date, shift_type)
                     DO UPDATE SET
                         avg_temperature = excluded.avg_temperature,
                         updated_at = strftime('%Y-%m-%d %H:%M:%S', 'now', 'localtime')"
                ),
                params![machine_id, shift_date, shift_type],
            )?;

            tx.commit()?;
            Ok(Some(TemperatureWrite {
                machine_name,
                alert_triggered: alert,
            }))
        })
        .await
        .map_err(map_tr_err)
}

/// Atomically read the current status, write the new one, and return the
/// previous value. Returns `None` when the machine does not exist.
pub async fn update_status(
    db: &Database,
    machine_id: MachineId,
    new_status: MachineStatus,
) -> Result<Option<StatusWrite>, FloormonError> {
    let status_text = new_status.to_string();

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let machine = tx.query_row(
                "SELECT name, status FROM machines WHERE id = ?1",
                params![machine_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        parse_column::<MachineStatus>(row, 1)?,
                    ))
                },
            );
            let (machine_name, previous_status) = match machine {
                Ok(pair) => pair,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                Err(e) => return Err(e.into()),
            };

            tx.execute(
                "UPDATE machines SET status = ?1,
                 updated_at = strftime('%Y-%m-%d %H:%M:%S', 'now', 'localtime')
                 WHERE id = ?2",
                params![status_text, machine_id],
            )?;

            tx.commit()?;
            Ok(Some(StatusWrite {
                machine_name,
                previous_status,
            }))
        })
        .await
        .map_err(map_tr_err)
}

/// Set (or clear) the machine's assigned operator.
pub async fn update_operator(
    db: &Database,
    machine_id: MachineId,
    operator_id: Option<OperatorId>,
) -> Result<OperatorWrite, FloormonError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let machine = tx.query_row(
                "SELECT name FROM machines WHERE id = ?1",
                params![machine_id],
                |row| row.get::<_, String>(0),
            );
            let machine_name = match machine {
                Ok(name) => name,
                Err(rusqlite::Error::QueryReturnedNoRows) => {
                    return Ok(OperatorWrite::MachineMissing)
                }
                Err(e) => return Err(e.into()),
            };

            if let Some(op_id) = operator_id {
                let exists = tx.query_row(
                    "SELECT 1 FROM operators WHERE id = ?1",
                    params![op_id],
                    |_| Ok(()),
                );
                match exists {
                    Ok(()) => {}
                    Err(rusqlite::Error::QueryReturnedNoRows) => {
                        return Ok(OperatorWrite::OperatorMissing)
                    }
                    Err(e) => return Err(e.into()),
                }
            }

            tx.execute(
                "UPDATE machines SET current_operator_id = ?1,
                 updated_at = strftime('%Y-%m-%d %H:%M:%S', 'now', 'localtime')
                 WHERE id = ?2",
                params![operator_id, machine_id],
            )?;

            tx.commit()?;
            Ok(OperatorWrite::Updated { machine_name })
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch the shift aggregate row for a (machine, date, shift) key.
pub async fn get_shift_aggregate(
    db: &Database,
    machine_id: MachineId,
    shift_date: &str,
    shift_type: ShiftType,
) -> Result<Option<ShiftAggregate>, FloormonError> {
    let shift_date = shift_date.to_string();
    let shift_text = shift_type.to_string();

    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT id, machine_id, shift_date, shift_type, total_units,
                        avg_temperature, downtime_minutes
                 FROM production_shifts
                 WHERE machine_id = ?1 AND shift_date = ?2 AND shift_type = ?3",
                params![machine_id, shift_date, shift_text],
                |row| {
                    Ok(ShiftAggregate {
                        id: row.get(0)?,
                        machine_id: row.get(1)?,
                        shift_date: row.get(2)?,
                        shift_type: parse_column(row, 3)?,
                        total_units: row.get(4)?,
                        avg_temperature: row.get(5)?,
                        downtime_minutes: row.get(6)?,
                    })
                },
            );
            match result {
                Ok(aggregate) => Ok(Some(aggregate)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}
