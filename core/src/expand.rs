// SPDX-FileCopyrightText: 2026 Praxis contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Lazy expansion of a recurrence rule into concrete occurrences.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};

use crate::error::Error;
use crate::rule::{MonthlyPattern, RecurrenceRule, RuleEnd, RulePattern, Weekday};
use crate::types::{Occurrence, TimeInterval};
use crate::wallclock::WallClock;

/// Default occurrence cap for unbounded rules, roughly two years of daily
/// occurrences.
pub const DEFAULT_SCAN_COUNT: usize = 730;

/// Safety bounds on expansion, applied on top of whatever termination the
/// rule itself declares. Expansion stops at whichever bound trips first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLimit {
    /// Maximum number of occurrences to emit.
    pub max_count: usize,
    /// No occurrence may start after this instant.
    pub max_date: DateTime<Utc>,
}

impl ScanLimit {
    /// Creates a scan limit from both bounds.
    pub fn new(max_count: usize, max_date: DateTime<Utc>) -> Self {
        Self {
            max_count,
            max_date,
        }
    }

    /// A limit bounded only by date, with the default occurrence cap.
    pub fn until(max_date: DateTime<Utc>) -> Self {
        Self::new(DEFAULT_SCAN_COUNT, max_date)
    }
}

/// Expands a series into its occurrences, lazily.
///
/// The anchor interval is the series' first, defining occurrence; every
/// generated occurrence keeps the anchor's wall-clock time of day and
/// duration in the clock's timezone, so series crossing a DST transition
/// stay at (say) 9:00 AM local rather than drifting by an hour. `None`
/// for the rule yields the anchor alone.
///
/// Fails with [`Error::InvalidRecurrence`] on rules that cannot produce a
/// well-defined series (zero interval, `COUNT=0`, out-of-range monthly
/// day or ordinal).
pub fn expand(
    anchor: TimeInterval,
    rule: Option<&RecurrenceRule>,
    scan: ScanLimit,
    clock: &WallClock,
) -> Result<OccurrenceIter, Error> {
    if anchor.end <= anchor.start {
        return Err(Error::InvalidInterval {
            start: anchor.start,
            end: anchor.end,
        });
    }
    let anchor_local = clock.local_datetime(anchor.start);
    let anchor_date = anchor_local.date();

    let (interval, end, cursor) = match rule {
        None => (1, RuleEnd::After(1), Cursor::Single { done: false }),
        Some(rule) => {
            if rule.interval == 0 {
                return Err(Error::InvalidRecurrence("interval must be positive".into()));
            }
            if rule.end == RuleEnd::After(0) {
                return Err(Error::InvalidRecurrence("count must be positive".into()));
            }
            let cursor = match &rule.pattern {
                RulePattern::Weekly { weekdays } => {
                    let days: Vec<Weekday> = if weekdays.is_empty() {
                        vec![Weekday::from_date(anchor_date)]
                    } else {
                        weekdays.iter().copied().collect()
                    };
                    let week_start = anchor_date
                        - TimeDelta::days(Weekday::from_date(anchor_date).days_from_sunday() as i64);
                    Cursor::Weekly {
                        days,
                        week_start,
                        pos: 0,
                    }
                }
                RulePattern::Monthly { pattern } => {
                    let pattern = pattern.unwrap_or_else(|| MonthlyPattern::day_of(anchor_date));
                    match pattern {
                        MonthlyPattern::DayOfMonth(day) if !(1..=31).contains(&day) => {
                            return Err(Error::InvalidRecurrence(format!(
                                "day of month out of range: {day}"
                            )));
                        }
                        MonthlyPattern::NthWeekday(n, _) if !(1..=5).contains(&n) => {
                            return Err(Error::InvalidRecurrence(format!(
                                "weekday ordinal out of range: {n}"
                            )));
                        }
                        _ => {}
                    }
                    Cursor::Monthly {
                        pattern,
                        year: anchor_date.year(),
                        month: anchor_date.month(),
                    }
                }
            };
            (rule.interval, rule.end, cursor)
        }
    };

    Ok(OccurrenceIter {
        anchor,
        duration: anchor.duration(),
        anchor_date,
        time: anchor_local.time(),
        interval,
        end,
        clock: *clock,
        scan,
        emitted: 0,
        cursor,
    })
}

/// Iterator over a series' occurrences. Created by [`expand`].
#[derive(Debug, Clone)]
pub struct OccurrenceIter {
    anchor: TimeInterval,
    duration: TimeDelta,
    anchor_date: NaiveDate,
    time: NaiveTime,
    interval: u32,
    end: RuleEnd,
    clock: WallClock,
    scan: ScanLimit,
    emitted: u32,
    cursor: Cursor,
}

#[derive(Debug, Clone)]
enum Cursor {
    Single {
        done: bool,
    },
    Weekly {
        days: Vec<Weekday>,
        /// Sunday of the week currently being scanned.
        week_start: NaiveDate,
        pos: usize,
    },
    Monthly {
        pattern: MonthlyPattern,
        year: i32,
        month: u32,
    },
}

impl Iterator for OccurrenceIter {
    type Item = Occurrence;

    fn next(&mut self) -> Option<Occurrence> {
        loop {
            if self.emitted as usize >= self.scan.max_count {
                return None;
            }
            if let RuleEnd::After(count) = self.end
                && self.emitted >= count
            {
                return None;
            }

            let date = match &mut self.cursor {
                Cursor::Single { done } => {
                    if *done {
                        return None;
                    }
                    *done = true;
                    self.anchor_date
                }
                Cursor::Weekly {
                    days,
                    week_start,
                    pos,
                } => {
                    let day = days[*pos];
                    let date = *week_start + TimeDelta::days(day.days_from_sunday() as i64);
                    *pos += 1;
                    if *pos >= days.len() {
                        *pos = 0;
                        *week_start += TimeDelta::days(7 * self.interval as i64);
                    }
                    date
                }
                Cursor::Monthly {
                    pattern,
                    year,
                    month,
                } => {
                    let (scan_y, scan_m) = (*year, *month);
                    let candidate = resolve_monthly(scan_y, scan_m, *pattern);
                    (*year, *month) = add_months(scan_y, scan_m, self.interval);
                    match candidate {
                        Some(date) => date,
                        None => {
                            tracing::debug!(?pattern, "month has no matching day, skipping");
                            // Even a month with no match must terminate the
                            // scan once it passes the horizon.
                            let month_start = NaiveDate::from_ymd_opt(scan_y, scan_m, 1);
                            let horizon = self.clock.local_date(self.scan.max_date);
                            if month_start.is_none_or(|d| d > horizon) {
                                return None;
                            }
                            continue;
                        }
                    }
                }
            };

            // Weekly sets can select weekdays earlier in the anchor's own
            // week; the series starts at the anchor, so those are skipped.
            if date < self.anchor_date {
                continue;
            }
            if let RuleEnd::OnDate(until) = self.end
                && date > until
            {
                return None;
            }

            let start = self.clock.resolve_local(NaiveDateTime::new(date, self.time));
            if start > self.scan.max_date {
                return None;
            }

            let occurrence = Occurrence {
                series_anchor: self.anchor,
                interval: TimeInterval {
                    start,
                    end: start + self.duration,
                },
                sequence_index: self.emitted,
            };
            self.emitted += 1;
            return Some(occurrence);
        }
    }
}

/// The date a monthly pattern selects within the given month, if any.
fn resolve_monthly(year: i32, month: u32, pattern: MonthlyPattern) -> Option<NaiveDate> {
    match pattern {
        MonthlyPattern::DayOfMonth(day) => NaiveDate::from_ymd_opt(year, month, day as u32),
        MonthlyPattern::NthWeekday(n, weekday) => nth_weekday_of_month(year, month, n, weekday),
        MonthlyPattern::LastWeekday(weekday) => last_weekday_of_month(year, month, weekday),
    }
}

fn nth_weekday_of_month(year: i32, month: u32, n: u8, weekday: Weekday) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let offset = (weekday.days_from_sunday() + 7 - Weekday::from_date(first).days_from_sunday()) % 7;
    let day = 1 + offset + 7 * (n as u32 - 1);
    NaiveDate::from_ymd_opt(year, month, day)
}

fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let (next_y, next_m) = add_months(year, month, 1);
    let last = NaiveDate::from_ymd_opt(next_y, next_m, 1)?.pred_opt()?;
    let back = (Weekday::from_date(last).days_from_sunday() + 7 - weekday.days_from_sunday()) % 7;
    last.checked_sub_days(chrono::Days::new(back as u64))
}

/// Advances `(year, month)` by `delta` months.
fn add_months(year: i32, month: u32, delta: u32) -> (i32, u32) {
    let total = year * 12 + (month as i32 - 1) + delta as i32;
    (total.div_euclid(12), total.rem_euclid(12) as u32 + 1)
}
