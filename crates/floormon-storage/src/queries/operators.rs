// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator CRUD operations.

use rusqlite::params;

use floormon_core::FloormonError;

use crate::database::{map_tr_err, Database};
use crate::models::{Operator, OperatorId, ShiftType};

/// Input for creating an operator.
#[derive(Debug, Clone)]
pub struct NewOperator {
    pub name: String,
    pub employee_id: String,
    pub shift_preference: Option<ShiftType>,
}

fn operator_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Operator> {
    let shift_preference = match row.get::<_, Option<String>>(3)? {
        Some(text) => Some(text.parse().map_err(|e: strum::ParseError| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?),
        None => None,
    };
    Ok(Operator {
        id: row.get(0)?,
        name: row.get(1)?,
        employee_id: row.get(2)?,
        shift_preference,
        created_at: row.get(4)?,
    })
}

const OPERATOR_COLUMNS: &str = "id, name, employee_id, shift_preference, created_at";

/// Create an operator. Returns the stored row.
pub async fn create_operator(db: &Database, new: NewOperator) -> Result<Operator, FloormonError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO operators (name, employee_id, shift_preference)
                 VALUES (?1, ?2, ?3)",
                params![
                    new.name,
                    new.employee_id,
                    new.shift_preference.map(|s| s.to_string()),
                ],
            )?;
            let id = conn.last_insert_rowid();
            let operator = conn.query_row(
                &format!("SELECT {OPERATOR_COLUMNS} FROM operators WHERE id = ?1"),
                params![id],
                operator_from_row,
            )?;
            Ok(operator)
        })
        .await
        .map_err(map_tr_err)
}

/// Get an operator by id.
pub async fn get_operator(
    db: &Database,
    id: OperatorId,
) -> Result<Option<Operator>, FloormonError> {
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                &format!("SELECT {OPERATOR_COLUMNS} FROM operators WHERE id = ?1"),
                params![id],
                operator_from_row,
            );
            match result {
                Ok(operator) => Ok(Some(operator)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// List all operators, oldest first.
pub async fn list_operators(db: &Database) -> Result<Vec<Operator>, FloormonError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn
                .prepare(&format!("SELECT {OPERATOR_COLUMNS} FROM operators ORDER BY id ASC"))?;
            let rows = stmt.query_map([], operator_from_row)?;
            let mut operators = Vec::new();
            for row in rows {
                operators.push(row?);
            }
            Ok(operators)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn create_and_get_operator_roundtrips() {
        let (db, _dir) = setup_db().await;

        let created = create_operator(
            &db,
            NewOperator {
                name: "Ada Lovelace".to_string(),
                employee_id: "EMP-001".to_string(),
                shift_preference: Some(ShiftType::Morning),
            },
        )
        .await
        .unwrap();

        let fetched = get_operator(&db, created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Ada Lovelace");
        assert_eq!(fetched.employee_id, "EMP-001");
        assert_eq!(fetched.shift_preference, Some(ShiftType::Morning));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn operator_without_preference() {
        let (db, _dir) = setup_db().await;
        let created = create_operator(
            &db,
            NewOperator {
                name: "No Pref".to_string(),
                employee_id: "EMP-002".to_string(),
                shift_preference: None,
            },
        )
        .await
        .unwrap();
        assert!(created.shift_preference.is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_employee_id_is_rejected() {
        let (db, _dir) = setup_db().await;
        let new = NewOperator {
            name: "A".to_string(),
            employee_id: "EMP-X".to_string(),
            shift_preference: None,
        };
        create_operator(&db, new.clone()).await.unwrap();
        assert!(create_operator(&db, new).await.is_err());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_operators_returns_all() {
        let (db, _dir) = setup_db().await;
        for i in 0..3 {
            create_operator(
                &db,
                NewOperator {
                    name: format!("Op {i}"),
                    employee_id: format!("EMP-{i}"),
                    shift_preference: None,
                },
            )
            .await
            .unwrap();
        }
        let all = list_operators(&db).await.unwrap();
        assert_eq!(all.len(), 3);
        db.close().await.unwrap();
    }
}
