// SPDX-FileCopyrightText: 2026 Praxis contributors
//
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::expand::{DEFAULT_SCAN_COUNT, ScanLimit};
use crate::wallclock::WallClock;

/// Engine configuration, usually deserialized from a TOML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// IANA timezone name, e.g. `"America/New_York"`. Falls back to the
    /// system timezone, then UTC.
    pub timezone: Option<String>,
    /// Maximum occurrences scanned per series.
    pub max_occurrences: usize,
    /// Scan horizon, in days from now.
    pub scan_horizon_days: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: None,
            max_occurrences: DEFAULT_SCAN_COUNT,
            scan_horizon_days: 730,
        }
    }
}

impl Config {
    /// The wall clock for the configured timezone.
    pub fn wall_clock(&self) -> WallClock {
        let tz = match &self.timezone {
            Some(name) => match name.parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    tracing::warn!(timezone = %name, "unknown timezone, using system timezone");
                    system_tz()
                }
            },
            None => system_tz(),
        };
        WallClock::new(tz)
    }

    /// The scan bounds, anchored at `now`.
    pub fn scan_limit(&self, now: DateTime<Utc>) -> ScanLimit {
        ScanLimit::new(
            self.max_occurrences,
            now + TimeDelta::days(self.scan_horizon_days),
        )
    }
}

fn system_tz() -> Tz {
    iana_time_zone::get_timezone()
        .ok()
        .and_then(|name| name.parse().ok())
        .unwrap_or_else(|| {
            tracing::warn!("system timezone unavailable, using UTC");
            Tz::UTC
        })
}
