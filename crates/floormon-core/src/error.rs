// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Floormon monitoring service.

use thiserror::Error;

/// The primary error type used across the Floormon crates.
#[derive(Debug, Error)]
pub enum FloormonError {
    /// Malformed or out-of-range input, rejected before any write happens.
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced entity (machine, operator) does not exist.
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: i64 },

    /// Storage backend errors (database connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Channel errors (server bind failure, socket errors).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
