// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Floormon monitoring service.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, the atomic telemetry write
//! operations, and the read-side aggregation queries the dashboard consumes.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod report;

pub use database::Database;
pub use models::*;
