// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-side aggregation queries for the dashboard.
//!
//! Every value here is a pure function of the stored readings, recomputed on
//! each call. There are no hidden counters: anything shown on the dashboard
//! can be re-derived from `production_data` and `temperature_logs` alone.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};
use rusqlite::params;
use serde::Serialize;

use floormon_core::types::{MachineStatus, MachineType, TIMESTAMP_FORMAT};
use floormon_core::FloormonError;

use crate::database::{map_tr_err, Database};
use crate::models::MachineId;
use crate::queries::machines::parse_column;

/// Operator fields shown on the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct OperatorSummary {
    pub id: i64,
    pub name: String,
    pub employee_id: String,
}

/// One machine row of the dashboard: state plus its latest readings.
#[derive(Debug, Clone, Serialize)]
pub struct MachineOverview {
    pub id: MachineId,
    pub name: String,
    #[serde(rename = "type")]
    pub machine_type: MachineType,
    pub status: MachineStatus,
    pub topic_id: String,
    pub current_operator: Option<OperatorSummary>,
    pub latest_production: i64,
    pub latest_temperature: f64,
}

/// Floor-wide statistics.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_machines: i64,
    pub running_machines: i64,
    pub total_production: i64,
    pub avg_temperature: f64,
}

/// Full dashboard payload.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub machines: Vec<MachineOverview>,
    pub stats: DashboardStats,
}

/// Peak temperature per machine within the trailing hour.
///
/// Machines with no reading in the window are absent from the map (the
/// snapshot reports 0 for them).
pub async fn latest_temperatures(
    db: &Database,
    now: NaiveDateTime,
) -> Result<HashMap<MachineId, f64>, FloormonError> {
    let since = (now - Duration::hours(1)).format(TIMESTAMP_FORMAT).to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT machine_id, MAX(temperature) FROM temperature_logs
                 WHERE recorded_at >= ?1
                 GROUP BY machine_id",
            )?;
            let rows = stmt.query_map(params![since], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?))
            })?;
            let mut map = HashMap::new();
            for row in rows {
                let (machine_id, temp) = row?;
                map.insert(machine_id, temp);
            }
            Ok(map)
        })
        .await
        .map_err(map_tr_err)
}

/// Units produced today (server-local calendar day), per machine.
pub async fn today_production(
    db: &Database,
    now: NaiveDateTime,
) -> Result<HashMap<MachineId, i64>, FloormonError> {
    let today = now.date().to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT machine_id, SUM(units_produced) FROM production_data
                 WHERE date(recorded_at) = ?1
                 GROUP BY machine_id",
            )?;
            let rows = stmt.query_map(params![today], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
            })?;
            let mut map = HashMap::new();
            for row in rows {
                let (machine_id, units) = row?;
                map.insert(machine_id, units);
            }
            Ok(map)
        })
        .await
        .map_err(map_tr_err)
}

/// Total units produced today across all machines.
pub async fn total_today_production(
    db: &Database,
    now: NaiveDateTime,
) -> Result<i64, FloormonError> {
    let today = now.date().to_string();
    db.connection()
        .call(move |conn| {
            Ok(conn.query_row(
                "SELECT COALESCE(SUM(units_produced), 0) FROM production_data
                 WHERE date(recorded_at) = ?1",
                params![today],
                |row| row.get(0),
            )?)
        })
        .await
        .map_err(map_tr_err)
}

/// Mean temperature across all machines within the trailing hour.
///
/// Defined as 0 when no readings exist in the window.
pub async fn rolling_avg_temperature(
    db: &Database,
    now: NaiveDateTime,
) -> Result<f64, FloormonError> {
    let since = (now - Duration::hours(1)).format(TIMESTAMP_FORMAT).to_string();
    db.connection()
        .call(move |conn| {
            Ok(conn.query_row(
                "SELECT COALESCE(AVG(temperature), 0) FROM temperature_logs
                 WHERE recorded_at >= ?1",
                params![since],
                |row| row.get(0),
            )?)
        })
        .await
        .map_err(map_tr_err)
}

/// Assemble the full dashboard snapshot as of `now`.
pub async fn snapshot(
    db: &Database,
    now: NaiveDateTime,
) -> Result<DashboardSnapshot, FloormonError> {
    let temps = latest_temperatures(db, now).await?;
    let production = today_production(db, now).await?;
    let total_production = total_today_production(db, now).await?;
    let avg_temperature = rolling_avg_temperature(db, now).await?;

    let machines: Vec<MachineOverview> = db
        .connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT m.id, m.name, m.type, m.status, m.topic_id,
                        o.id, o.name, o.employee_id
                 FROM machines m
                 LEFT JOIN operators o ON m.current_operator_id = o.id
                 ORDER BY m.id ASC",
            )?;
            let rows = stmt.query_map([], |row| {
                let operator = match row.get::<_, Option<i64>>(5)? {
                    Some(op_id) => Some(OperatorSummary {
                        id: op_id,
                        name: row.get(6)?,
                        employee_id: row.get(7)?,
                    }),
                    None => None,
                };
                Ok(MachineOverview {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    machine_type: parse_column(row, 2)?,
                    status: parse_column(row, 3)?,
                    topic_id: row.get(4)?,
                    current_operator: operator,
                    latest_production: 0,
                    latest_temperature: 0.0,
                })
            })?;
            let mut machines = Vec::new();
            for row in rows {
                machines.push(row?);
            }
            Ok(machines)
        })
        .await
        .map_err(map_tr_err)?;

    let machines: Vec<MachineOverview> = machines
        .into_iter()
        .map(|mut m| {
            m.latest_production = production.get(&m.id).copied().unwrap_or(0);
            m.latest_temperature = temps.get(&m.id).copied().unwrap_or(0.0);
            m
        })
        .collect();

    let total_machines = machines.len() as i64;
    let running_machines = machines
        .iter()
        .filter(|m| m.status == MachineStatus::Running)
        .count() as i64;

    Ok(DashboardSnapshot {
        machines,
        stats: DashboardStats {
            total_machines,
            running_machines,
            total_production,
            avg_temperature: (avg_temperature * 10.0).round() / 10.0,
        },
    })
}
