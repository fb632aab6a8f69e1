// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./floormon.toml` > `~/.config/floormon/floormon.toml`
//! > `/etc/floormon/floormon.toml` with environment variable overrides via
//! `FLOORMON_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::FloormonConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/floormon/floormon.toml` (system-wide)
/// 3. `~/.config/floormon/floormon.toml` (user XDG config)
/// 4. `./floormon.toml` (local directory)
/// 5. `FLOORMON_*` environment variables
pub fn load_config() -> Result<FloormonConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FloormonConfig::default()))
        .merge(Toml::file("/etc/floormon/floormon.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("floormon/floormon.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("floormon.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<FloormonConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FloormonConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<FloormonConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FloormonConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `FLOORMON_STORAGE_DATABASE_PATH` must map
/// to `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("FLOORMON_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        let mapped = key
            .as_str()
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("simulator_", "simulator.", 1);
        mapped.into()
    })
}
