// SPDX-FileCopyrightText: 2026 Praxis contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Test data factories for integration tests.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use praxis_core::{
    AvailabilityBlock, DEFAULT_SCAN_COUNT, DailyLimit, Reconciler, ScanLimit, TimeInterval,
    WallClock,
};

/// A UTC instant from calendar fields.
pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// A one-hour interval starting at the given UTC hour.
pub fn hour_slot(y: i32, m: u32, d: u32, h: u32) -> TimeInterval {
    TimeInterval::new(utc(y, m, d, h, 0), utc(y, m, d, h + 1, 0)).unwrap()
}

/// A UTC wall clock.
pub fn utc_clock() -> WallClock {
    WallClock::new(chrono_tz::UTC)
}

/// A scan limit generous enough not to interfere with rule-bounded tests.
pub fn wide_scan() -> ScanLimit {
    ScanLimit::new(DEFAULT_SCAN_COUNT, utc(2030, 1, 1, 0, 0))
}

/// A UTC reconciler with the wide scan limit.
pub fn reconciler() -> Reconciler {
    Reconciler::new(utc_clock(), wide_scan())
}

/// A non-recurring, staff-only availability block.
pub fn availability(clinician_id: &str, interval: TimeInterval) -> AvailabilityBlock {
    AvailabilityBlock {
        clinician_id: clinician_id.to_string(),
        interval,
        allow_online_requests: false,
        recurrence: None,
    }
}

/// A daily limit record.
pub fn limit(clinician_id: &str, date: NaiveDate, max: Option<u32>) -> DailyLimit {
    DailyLimit {
        clinician_id: clinician_id.to_string(),
        date,
        max_appointments: max,
    }
}
