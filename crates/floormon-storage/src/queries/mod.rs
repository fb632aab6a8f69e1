// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per concern.

pub mod dashboard;
pub mod machines;
pub mod operators;
pub mod readings;
