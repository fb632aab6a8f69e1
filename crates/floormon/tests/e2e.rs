// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the complete ingestion pipeline.
//!
//! Each test builds an isolated TestHarness on a temp SQLite database and
//! drives the gateway router (where transport behavior matters) or the
//! ingestion service directly. Tests are independent and order-insensitive.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use floormon_core::types::{parse_timestamp, MachineStatus, MachineType, ShiftType};
use floormon_gateway::{router, GatewayState};
use floormon_storage::queries::{dashboard, readings};
use floormon_test_utils::TestHarness;

fn ts(s: &str) -> chrono::NaiveDateTime {
    parse_timestamp(s).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ---- Reading arrives -> durable record, derived event, live frame ----

#[tokio::test]
async fn full_pipeline_from_http_to_live_frame() {
    let harness = TestHarness::new().await.unwrap();
    let machine = harness
        .add_machine("Press 7", MachineType::Press, MachineStatus::Running)
        .await
        .unwrap();

    let state = GatewayState {
        service: harness.service.clone(),
        db: harness.db.clone(),
        bus: harness.bus.clone(),
    };
    let app = router(state);
    let mut rx = harness.bus.subscribe();

    let response = app
        .oneshot(post_json(
            &format!("/api/machines/{}/temperature", machine.id),
            serde_json::json!({"temperature": 85.5, "timestamp": "2024-01-01 10:00:00"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["data"]["temperature"], 85.5);

    // Durable record carries the alert flag.
    let machine_id = machine.id;
    let flag: bool = harness
        .db
        .connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT alert_triggered FROM temperature_logs WHERE machine_id = ?1",
                (machine_id,),
                |row| row.get(0),
            )
        })
        .await
        .unwrap();
    assert!(flag);

    // Live subscribers got exactly one alert frame.
    let frame: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
    assert_eq!(frame["event"], "temperature.alert.triggered");
    assert_eq!(frame["data"]["machineId"], machine.id);
    assert_eq!(frame["data"]["temperature"], 85.5);
    assert!(rx.try_recv().is_err());
}

// ---- Threshold crossings recorded exactly once across a mixed sequence ----

#[tokio::test]
async fn alert_fires_once_per_crossing_reading_only() {
    let harness = TestHarness::new().await.unwrap();
    let machine = harness
        .add_machine("CNC 1", MachineType::Cnc, MachineStatus::Running)
        .await
        .unwrap();
    let mut rx = harness.bus.subscribe();

    let sequence = [
        (75.0, false),
        (85.5, true),
        (80.0, false),
        (90.0, true),
        (79.9, false),
    ];
    for (i, (temperature, _)) in sequence.iter().enumerate() {
        harness
            .service
            .record_temperature(
                machine.id,
                *temperature,
                ts(&format!("2024-01-01 10:0{i}:00")),
            )
            .await
            .unwrap();
    }

    // Exactly the two crossing readings produced alert frames, in order.
    for expected_temp in [85.5, 90.0] {
        let frame: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(frame["event"], "temperature.alert.triggered");
        assert_eq!(frame["data"]["temperature"], expected_temp);
    }
    assert!(rx.try_recv().is_err());
}

// ---- Aggregation view is re-derivable from raw readings ----

#[tokio::test]
async fn today_total_equals_sum_of_raw_readings() {
    let harness = TestHarness::new().await.unwrap();
    let machine = harness
        .add_machine("Mill 3", MachineType::Milling, MachineStatus::Running)
        .await
        .unwrap();

    let mut expected = 0;
    for units in [5, 7, 3, 12] {
        expected += units;
        harness
            .service
            .record_production(machine.id, units, ts("2024-01-01 10:00:00"))
            .await
            .unwrap();
    }

    let per_machine = dashboard::today_production(&harness.db, ts("2024-01-01 20:00:00"))
        .await
        .unwrap();
    assert_eq!(per_machine.get(&machine.id), Some(&expected));

    let total = dashboard::total_today_production(&harness.db, ts("2024-01-01 20:00:00"))
        .await
        .unwrap();
    assert_eq!(total, expected);
}

// ---- Concurrent producers for the same machine ----

#[tokio::test]
async fn two_concurrent_writes_raise_total_by_their_sum() {
    let harness = TestHarness::new().await.unwrap();
    let machine = harness
        .add_machine("Press 3", MachineType::Press, MachineStatus::Running)
        .await
        .unwrap();

    let s1 = harness.service.clone();
    let s2 = harness.service.clone();
    let id = machine.id;
    let (r1, r2) = tokio::join!(
        tokio::spawn(async move { s1.record_production(id, 5, ts("2024-01-01 10:00:00")).await }),
        tokio::spawn(async move { s2.record_production(id, 7, ts("2024-01-01 10:00:30")).await }),
    );
    r1.unwrap().unwrap();
    r2.unwrap().unwrap();

    let agg = readings::get_shift_aggregate(&harness.db, machine.id, "2024-01-01", ShiftType::Morning)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(agg.total_units, 12);
}

// ---- Status lifecycle across no-op transitions ----

#[tokio::test]
async fn status_history_reports_accurate_previous_values() {
    let harness = TestHarness::new().await.unwrap();
    let machine = harness
        .add_machine("Asm 1", MachineType::Assembly, MachineStatus::Idle)
        .await
        .unwrap();
    let mut rx = harness.bus.subscribe();

    let transitions = [
        (MachineStatus::Idle, MachineStatus::Idle),
        (MachineStatus::Running, MachineStatus::Idle),
        (MachineStatus::Running, MachineStatus::Running),
        (MachineStatus::Maintenance, MachineStatus::Running),
    ];
    for (new_status, expected_previous) in transitions {
        let outcome = harness
            .service
            .update_status(machine.id, new_status)
            .await
            .unwrap();
        assert_eq!(outcome.previous_status, expected_previous);
    }

    // Every transition, including the two no-ops, produced a frame.
    for (new_status, expected_previous) in transitions {
        let frame: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(frame["data"]["status"], new_status.to_string());
        assert_eq!(frame["data"]["previousStatus"], expected_previous.to_string());
    }
}

// ---- Machine deletion cascades its history ----

#[tokio::test]
async fn deleting_machine_removes_reading_history() {
    let harness = TestHarness::new().await.unwrap();
    let machine = harness
        .add_machine("Scrap", MachineType::Press, MachineStatus::Running)
        .await
        .unwrap();

    harness
        .service
        .record_production(machine.id, 5, ts("2024-01-01 10:00:00"))
        .await
        .unwrap();
    harness
        .service
        .record_temperature(machine.id, 70.0, ts("2024-01-01 10:00:00"))
        .await
        .unwrap();

    floormon_storage::queries::machines::delete_machine(&harness.db, machine.id)
        .await
        .unwrap();

    let (prod, temp): (i64, i64) = harness
        .db
        .connection()
        .call(|conn| -> tokio_rusqlite::Result<(i64, i64)> {
            let prod = conn.query_row("SELECT COUNT(*) FROM production_data", [], |r| r.get(0))?;
            let temp = conn.query_row("SELECT COUNT(*) FROM temperature_logs", [], |r| r.get(0))?;
            Ok((prod, temp))
        })
        .await
        .unwrap();
    assert_eq!((prod, temp), (0, 0));
}
