// SPDX-FileCopyrightText: 2026 Praxis contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Common test utilities for integration tests.

mod fixtures;

#[allow(unused_imports)]
pub use fixtures::{
    availability, hour_slot, limit, reconciler, utc, utc_clock, wide_scan,
};
