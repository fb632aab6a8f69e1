// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Floormon - factory-floor telemetry monitoring service.
//!
//! This is the binary entry point for the Floormon server and simulator.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;
mod simulate;

/// Floormon - factory-floor telemetry monitoring service.
#[derive(Parser, Debug)]
#[command(name = "floormon", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the monitoring gateway server.
    Serve,
    /// Publish synthetic machine telemetry against a running gateway.
    Simulate {
        /// Seconds between publication rounds (overrides config).
        #[arg(long)]
        interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match floormon_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            floormon_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.server.log_level);

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Simulate { interval }) => {
            let mut config = config;
            if let Some(interval) = interval {
                config.simulator.interval_secs = interval;
            }
            simulate::run_simulate(config).await
        }
        None => {
            println!("floormon: use --help for available commands");
            return;
        }
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "floormon exited with error");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("floormon={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
