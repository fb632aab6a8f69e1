// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CSV production report export.

use floormon_core::FloormonError;

use crate::database::{map_tr_err, Database};

/// One row of the production report join.
#[derive(Debug, Clone)]
struct ReportRow {
    id: i64,
    machine_name: String,
    machine_type: String,
    units_produced: i64,
    shift_type: String,
    recorded_at: String,
    operator_name: Option<String>,
}

/// Render the full production history as CSV, newest first.
///
/// The output starts with a UTF-8 BOM for Excel compatibility. Machines with
/// no assigned operator report `Unassigned`.
pub async fn production_report_csv(db: &Database) -> Result<Vec<u8>, FloormonError> {
    let rows: Vec<ReportRow> = db
        .connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT p.id, m.name, m.type, p.units_produced, p.shift_type,
                        p.recorded_at, o.name
                 FROM production_data p
                 JOIN machines m ON p.machine_id = m.id
                 LEFT JOIN operators o ON m.current_operator_id = o.id
                 ORDER BY p.recorded_at DESC",
            )?;
            let mapped = stmt.query_map([], |row| {
                Ok(ReportRow {
                    id: row.get(0)?,
                    machine_name: row.get(1)?,
                    machine_type: row.get(2)?,
                    units_produced: row.get(3)?,
                    shift_type: row.get(4)?,
                    recorded_at: row.get(5)?,
                    operator_name: row.get(6)?,
                })
            })?;
            let mut rows = Vec::new();
            for row in mapped {
                rows.push(row?);
            }
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)?;

    let mut buf: Vec<u8> = Vec::new();
    buf.extend_from_slice(b"\xEF\xBB\xBF");

    let mut writer = csv::Writer::from_writer(&mut buf);
    writer
        .write_record([
            "ID",
            "Machine Name",
            "Type",
            "Units Produced",
            "Shift",
            "Recorded At",
            "Operator Name",
        ])
        .map_err(|e| FloormonError::Internal(format!("csv write failed: {e}")))?;

    for row in &rows {
        writer
            .write_record([
                row.id.to_string().as_str(),
                &row.machine_name,
                &row.machine_type,
                row.units_produced.to_string().as_str(),
                &row.shift_type,
                &row.recorded_at,
                row.operator_name.as_deref().unwrap_or("Unassigned"),
            ])
            .map_err(|e| FloormonError::Internal(format!("csv write failed: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| FloormonError::Internal(format!("csv flush failed: {e}")))?;
    drop(writer);

    Ok(buf)
}
