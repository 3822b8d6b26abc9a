// SPDX-FileCopyrightText: 2026 Praxis contributors
//
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, TimeZone};

/// Formats the span between two instants as a human-readable label.
///
/// Timed spans render in whole minutes (`"50 mins"`, rounded to nearest);
/// all-day spans render in whole calendar days (`"1 day"`, `"3 days"`).
/// Missing endpoints and non-positive spans both render as `"0 mins"`, so
/// the label never shows negative time even on inconsistent input.
pub fn format_duration<Tz: TimeZone>(
    start: Option<&DateTime<Tz>>,
    end: Option<&DateTime<Tz>>,
    is_all_day: bool,
) -> String {
    let (Some(start), Some(end)) = (start, end) else {
        return "0 mins".to_string();
    };

    if is_all_day {
        let days = (end.date_naive() - start.date_naive()).num_days().max(0);
        if days == 1 {
            "1 day".to_string()
        } else {
            format!("{days} days")
        }
    } else {
        let secs = end.clone().signed_duration_since(start.clone()).num_seconds();
        let mins = (secs as f64 / 60.0).round() as i64;
        if mins <= 0 {
            "0 mins".to_string()
        } else {
            format!("{mins} mins")
        }
    }
}
