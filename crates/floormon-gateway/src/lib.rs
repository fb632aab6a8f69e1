// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP/WebSocket gateway for the Floormon monitoring service.
//!
//! The gateway is a thin input adapter: it validates transport-level input,
//! hands telemetry to the ingestion service, serves the read-side dashboard
//! queries, and forwards the live broadcast channel to WebSocket clients.

pub mod admin;
pub mod handlers;
pub mod server;
pub mod ws;

pub use server::{router, start_server, GatewayState};
