// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `floormon simulate` command implementation.
//!
//! An external producer of synthetic telemetry: each round it fetches the
//! machine list and posts production counts, temperature readings, and the
//! occasional status change to the gateway's HTTP API -- the same surface
//! real sensors use. Transient failures are logged and retried on the next
//! round (sleep-and-retry); the gateway owns no retry of its own.

use std::time::Duration;

use rand::Rng;
use serde_json::json;
use tracing::{info, warn};

use floormon_config::model::FloormonConfig;
use floormon_core::types::{now_timestamp, Machine, MachineStatus};
use floormon_core::FloormonError;

/// Runs the `floormon simulate` command.
pub async fn run_simulate(config: FloormonConfig) -> Result<(), FloormonError> {
    let base_url = config.simulator.base_url.trim_end_matches('/').to_string();
    let interval = Duration::from_secs(config.simulator.interval_secs);

    let client = reqwest::Client::new();

    // One up-front fetch so an unseeded database fails fast.
    let machines = fetch_machines(&client, &base_url).await?;
    if machines.is_empty() {
        return Err(FloormonError::NotFound {
            what: "machine",
            id: 0,
        });
    }

    info!(
        machines = machines.len(),
        interval_secs = config.simulator.interval_secs,
        "simulating machine data; press Ctrl+C to stop"
    );

    loop {
        match fetch_machines(&client, &base_url).await {
            Ok(machines) => {
                for machine in &machines {
                    simulate_machine(&client, &base_url, machine).await;
                }
            }
            Err(e) => {
                warn!(error = %e, "connection error; retrying next round");
            }
        }

        tokio::time::sleep(interval).await;
    }
}

async fn fetch_machines(
    client: &reqwest::Client,
    base_url: &str,
) -> Result<Vec<Machine>, FloormonError> {
    client
        .get(format!("{base_url}/api/machines"))
        .send()
        .await
        .map_err(channel_err)?
        .json()
        .await
        .map_err(channel_err)
}

/// Publish one round of synthetic readings for a machine.
async fn simulate_machine(client: &reqwest::Client, base_url: &str, machine: &Machine) {
    let timestamp = now_timestamp();

    // Production count (1-10 units per round), only while running.
    if machine.status == MachineStatus::Running {
        let units = rand::thread_rng().gen_range(1..=10);
        let result = client
            .post(format!("{base_url}/api/machines/{}/production", machine.id))
            .json(&json!({ "units": units, "timestamp": timestamp }))
            .send()
            .await;
        match result {
            Ok(_) => info!(machine = machine.name.as_str(), units, "produced units"),
            Err(e) => warn!(machine = machine.name.as_str(), error = %e, "failed to record production"),
        }
    }

    // Temperature 60-90 degrees, with occasional spikes above the threshold.
    let temperature = {
        let mut rng = rand::thread_rng();
        let base: i64 = rng.gen_range(60..=90);
        let spike: i64 = if rng.gen_range(0..100) > 90 {
            rng.gen_range(10..=20)
        } else {
            0
        };
        (base + spike) as f64
    };
    let result = client
        .post(format!("{base_url}/api/machines/{}/temperature", machine.id))
        .json(&json!({ "temperature": temperature, "timestamp": timestamp }))
        .send()
        .await;
    match result {
        Ok(_) => {
            if temperature > 80.0 {
                warn!(machine = machine.name.as_str(), temperature, "high temperature");
            }
        }
        Err(e) => warn!(machine = machine.name.as_str(), error = %e, "failed to record temperature"),
    }

    // Status change, 10% of rounds.
    if rand::thread_rng().gen_range(1..=100) <= 10 {
        let statuses = ["running", "idle", "maintenance"];
        let new_status = statuses[rand::thread_rng().gen_range(0..statuses.len())];
        let result = client
            .post(format!("{base_url}/api/machines/{}/status", machine.id))
            .json(&json!({ "status": new_status }))
            .send()
            .await;
        match result {
            Ok(_) => info!(machine = machine.name.as_str(), status = new_status, "status changed"),
            Err(e) => warn!(machine = machine.name.as_str(), error = %e, "failed to update status"),
        }
    }
}

fn channel_err(e: reqwest::Error) -> FloormonError {
    FloormonError::Channel {
        message: format!("gateway request failed: {e}"),
        source: Some(Box::new(e)),
    }
}
