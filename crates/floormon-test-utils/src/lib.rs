// SPDX-FileCopyrightText: 2026 Floormon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Floormon integration tests.

pub mod harness;

pub use harness::TestHarness;
