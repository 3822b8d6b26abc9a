// SPDX-FileCopyrightText: 2026 Praxis contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::OnceLock;

use chrono::{
    DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc,
};
use chrono_tz::Tz;
use regex::Regex;

use crate::error::Error;

/// Which edge of the day a date-only or all-day value resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayEdge {
    /// Start of day, `00:00:00`.
    Start,
    /// End of day, `23:59:59`.
    End,
}

/// Converts user-entered wall-clock fields to absolute instants and back,
/// always through one configured timezone.
///
/// Every conversion in the engine goes through this type; nothing else
/// does offset arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallClock {
    tz: Tz,
}

impl WallClock {
    /// Creates a wall clock for the given timezone.
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// The configured timezone.
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Combines a calendar date and an optional time string into an
    /// instant.
    ///
    /// The time string may be 12-hour (`"9:00 AM"`) or 24-hour
    /// (`"09:00"`). All-day values ignore the time string and resolve to
    /// the start of day or `23:59:59` depending on `edge`; a missing time
    /// on a non-all-day value resolves to the same day-edge defaults.
    pub fn to_instant(
        &self,
        date: NaiveDate,
        time: Option<&str>,
        is_all_day: bool,
        edge: DayEdge,
    ) -> Result<DateTime<Utc>, Error> {
        let time = match time {
            Some(s) if !is_all_day => parse_time_string(s)?,
            _ => edge_time(edge),
        };
        Ok(self.resolve_local(NaiveDateTime::new(date, time)))
    }

    /// Splits an instant back into the local date and a 24-hour `HH:MM`
    /// string.
    pub fn from_instant(&self, instant: DateTime<Utc>) -> (NaiveDate, String) {
        let local = instant.with_timezone(&self.tz);
        (local.date_naive(), local.format("%H:%M").to_string())
    }

    /// The local calendar date of an instant.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    /// The local wall-clock datetime of an instant.
    pub fn local_datetime(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.tz).naive_local()
    }

    /// Resolves a local wall-clock datetime to an instant.
    ///
    /// Ambiguous local times (DST fall-back) pick the earliest offset;
    /// nonexistent local times (DST spring-forward gap) shift forward one
    /// hour.
    pub fn resolve_local(&self, naive: NaiveDateTime) -> DateTime<Utc> {
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(dt, _) => {
                tracing::warn!(%naive, tz = %self.tz, "ambiguous local time, picking earliest");
                dt.with_timezone(&Utc)
            }
            LocalResult::None => {
                tracing::warn!(%naive, tz = %self.tz, "nonexistent local time, shifting forward");
                let shifted = naive + TimeDelta::hours(1);
                match self.tz.from_local_datetime(&shifted) {
                    LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                        dt.with_timezone(&Utc)
                    }
                    LocalResult::None => Utc.from_utc_datetime(&naive),
                }
            }
        }
    }
}

fn edge_time(edge: DayEdge) -> NaiveTime {
    match edge {
        DayEdge::Start => NaiveTime::MIN,
        DayEdge::End => NaiveTime::from_hms_opt(23, 59, 59).unwrap(),
    }
}

/// Parses `"h:mm AM/PM"` or `"HH:mm"` into a time of day.
pub(crate) fn parse_time_string(s: &str) -> Result<NaiveTime, Error> {
    const RE_12H: &str = r"(?i)^\s*(\d{1,2}):(\d{2})\s*([AP])\.?M\.?\s*$";
    const RE_24H: &str = r"^\s*(\d{1,2}):(\d{2})\s*$";
    static REGEX_12H: OnceLock<Regex> = OnceLock::new();
    static REGEX_24H: OnceLock<Regex> = OnceLock::new();

    let invalid = || Error::InvalidTimeFormat(s.to_string());

    let re_12h = REGEX_12H.get_or_init(|| Regex::new(RE_12H).unwrap());
    if let Some(captures) = re_12h.captures(s) {
        let hour: u32 = captures[1].parse().map_err(|_| invalid())?;
        let minute: u32 = captures[2].parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&hour) {
            return Err(invalid());
        }
        let pm = captures[3].eq_ignore_ascii_case("p");
        let hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        };
        return NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid);
    }

    let re_24h = REGEX_24H.get_or_init(|| Regex::new(RE_24H).unwrap());
    if let Some(captures) = re_24h.captures(s) {
        let hour: u32 = captures[1].parse().map_err(|_| invalid())?;
        let minute: u32 = captures[2].parse().map_err(|_| invalid())?;
        return NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid);
    }

    Err(invalid())
}
