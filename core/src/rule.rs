// SPDX-FileCopyrightText: 2026 Praxis contributors
//
// SPDX-License-Identifier: Apache-2.0

//! The compact recurrence rule grammar
//! (`FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE;COUNT=10`) and its structured
//! model.
//!
//! The string form is the persisted/wire format and must stay bit-exact
//! for interop with existing rules; [`std::fmt::Display`] is the builder
//! and [`std::str::FromStr`] the parser.

use std::collections::BTreeSet;
use std::fmt::{self, Display};
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::de;

use crate::error::Error;

/// Recurrence frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
pub enum Frequency {
    /// Steps of whole weeks.
    #[strum(serialize = "WEEKLY")]
    Weekly,
    /// Steps of whole months.
    #[strum(serialize = "MONTHLY")]
    Monthly,
}

/// Day of the week.
///
/// Variant order is the canonical week order (SU..SA), so the derived
/// `Ord` sorts weekday sets the way `BYDAY` must be emitted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumString,
)]
#[expect(missing_docs)]
pub enum Weekday {
    #[strum(serialize = "SU")]
    Sunday,
    #[strum(serialize = "MO")]
    Monday,
    #[strum(serialize = "TU")]
    Tuesday,
    #[strum(serialize = "WE")]
    Wednesday,
    #[strum(serialize = "TH")]
    Thursday,
    #[strum(serialize = "FR")]
    Friday,
    #[strum(serialize = "SA")]
    Saturday,
}

impl Weekday {
    /// Days from Sunday, `0..=6`.
    pub fn days_from_sunday(self) -> u32 {
        self as u32
    }

    /// The weekday of a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        date.weekday().into()
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Sun => Weekday::Sunday,
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
        }
    }
}

/// How a monthly rule picks its day in each target month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthlyPattern {
    /// The same numbered day each month (`BYMONTHDAY=14`). Months lacking
    /// the day skip that occurrence; there is no clamping.
    DayOfMonth(u8),
    /// The nth weekday of each month, 1-based (`BYDAY=2TU`).
    NthWeekday(u8, Weekday),
    /// The last matching weekday of each month (`BYDAY=-1TU`).
    LastWeekday(Weekday),
}

impl MonthlyPattern {
    /// Pattern keeping the anchor's day of month.
    pub fn day_of(anchor: NaiveDate) -> Self {
        Self::DayOfMonth(anchor.day() as u8)
    }

    /// Pattern keeping the anchor's weekday and ordinal in its month,
    /// e.g. "2nd Tuesday".
    pub fn nth_weekday_of(anchor: NaiveDate) -> Self {
        let ordinal = (anchor.day() - 1) / 7 + 1;
        Self::NthWeekday(ordinal as u8, Weekday::from_date(anchor))
    }

    /// Pattern keeping the anchor's weekday, pinned to the last of each
    /// month.
    pub fn last_weekday_of(anchor: NaiveDate) -> Self {
        Self::LastWeekday(Weekday::from_date(anchor))
    }
}

/// When a series stops producing occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleEnd {
    /// No intrinsic bound; expansion relies entirely on the caller's scan
    /// limit.
    Never,
    /// Stop after this many occurrences (`COUNT=`).
    After(u32),
    /// Last day an occurrence may start on, inclusive (`UNTIL=`).
    OnDate(NaiveDate),
}

/// The frequency-specific part of a rule. Weekly weekday sets and monthly
/// day patterns cannot be combined, by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulePattern {
    /// Weekly on the given weekdays; an empty set means the anchor's own
    /// weekday, resolved at expansion time.
    Weekly {
        /// Selected weekdays, kept in canonical week order.
        weekdays: BTreeSet<Weekday>,
    },
    /// Monthly by the given pattern; `None` means the anchor's day of
    /// month, resolved at expansion time.
    Monthly {
        /// Day selection pattern, if pinned in the rule itself.
        pattern: Option<MonthlyPattern>,
    },
}

/// A structured recurrence description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    /// Frequency-specific day selection.
    pub pattern: RulePattern,
    /// Number of frequency units between steps, at least 1.
    pub interval: u32,
    /// Termination condition.
    pub end: RuleEnd,
}

impl RecurrenceRule {
    /// A weekly rule on the given weekdays (duplicates collapse, order is
    /// canonicalized).
    pub fn weekly<I: IntoIterator<Item = Weekday>>(weekdays: I) -> Self {
        Self {
            pattern: RulePattern::Weekly {
                weekdays: weekdays.into_iter().collect(),
            },
            interval: 1,
            end: RuleEnd::Never,
        }
    }

    /// A monthly rule with the given day pattern.
    pub fn monthly(pattern: MonthlyPattern) -> Self {
        Self {
            pattern: RulePattern::Monthly {
                pattern: Some(pattern),
            },
            interval: 1,
            end: RuleEnd::Never,
        }
    }

    /// Sets the step interval.
    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the termination condition.
    pub fn with_end(mut self, end: RuleEnd) -> Self {
        self.end = end;
        self
    }

    /// The rule's frequency.
    pub fn frequency(&self) -> Frequency {
        match self.pattern {
            RulePattern::Weekly { .. } => Frequency::Weekly,
            RulePattern::Monthly { .. } => Frequency::Monthly,
        }
    }
}

impl Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FREQ={}", self.frequency())?;
        if self.interval > 1 {
            write!(f, ";INTERVAL={}", self.interval)?;
        }
        match &self.pattern {
            RulePattern::Weekly { weekdays } if !weekdays.is_empty() => {
                write!(f, ";BYDAY=")?;
                for (i, day) in weekdays.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{day}")?;
                }
            }
            RulePattern::Weekly { .. } => {}
            RulePattern::Monthly { pattern } => match pattern {
                Some(MonthlyPattern::DayOfMonth(day)) => write!(f, ";BYMONTHDAY={day}")?,
                Some(MonthlyPattern::NthWeekday(n, day)) => write!(f, ";BYDAY={n}{day}")?,
                Some(MonthlyPattern::LastWeekday(day)) => write!(f, ";BYDAY=-1{day}")?,
                None => {}
            },
        }
        match self.end {
            RuleEnd::Never => Ok(()),
            RuleEnd::After(count) => write!(f, ";COUNT={count}"),
            RuleEnd::OnDate(date) => write!(f, ";UNTIL={}T235959Z", date.format("%Y%m%d")),
        }
    }
}

impl FromStr for RecurrenceRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let mut freq = None;
        let mut interval = None;
        let mut byday: Option<Vec<(Option<i8>, Weekday)>> = None;
        let mut by_month_day = None;
        let mut count = None;
        let mut until = None;

        for part in s.split(';').filter(|p| !p.trim().is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| Error::MalformedRule(format!("expected key=value, got {part:?}")))?;
            match key.trim() {
                "FREQ" => {
                    freq = Some(value.parse::<Frequency>().map_err(|_| {
                        Error::MalformedRule(format!("unrecognized FREQ value {value:?}"))
                    })?);
                }
                "INTERVAL" => {
                    let n: u32 = value.parse().map_err(|_| {
                        Error::MalformedRule(format!("invalid INTERVAL value {value:?}"))
                    })?;
                    if n == 0 {
                        return Err(Error::MalformedRule("INTERVAL must be positive".into()));
                    }
                    interval = Some(n);
                }
                "BYDAY" => {
                    byday = Some(
                        value
                            .split(',')
                            .map(parse_byday_entry)
                            .collect::<Result<_, _>>()?,
                    );
                }
                "BYMONTHDAY" => {
                    let day: u8 = value.parse().map_err(|_| {
                        Error::MalformedRule(format!("invalid BYMONTHDAY value {value:?}"))
                    })?;
                    if !(1..=31).contains(&day) {
                        return Err(Error::MalformedRule(format!(
                            "BYMONTHDAY out of range: {day}"
                        )));
                    }
                    by_month_day = Some(day);
                }
                "COUNT" => {
                    let n: u32 = value.parse().map_err(|_| {
                        Error::MalformedRule(format!("invalid COUNT value {value:?}"))
                    })?;
                    if n == 0 {
                        return Err(Error::MalformedRule("COUNT must be positive".into()));
                    }
                    count = Some(n);
                }
                "UNTIL" => until = Some(parse_until(value)?),
                other => tracing::debug!(key = other, "ignoring unknown rule part"),
            }
        }

        let freq = freq.ok_or_else(|| Error::MalformedRule("missing FREQ".into()))?;
        if count.is_some() && until.is_some() {
            return Err(Error::MalformedRule(
                "COUNT and UNTIL are mutually exclusive".into(),
            ));
        }
        let end = match (count, until) {
            (Some(n), _) => RuleEnd::After(n),
            (_, Some(date)) => RuleEnd::OnDate(date),
            _ => RuleEnd::Never,
        };

        let pattern = match freq {
            Frequency::Weekly => {
                let weekdays = byday
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(ordinal, day)| {
                        if ordinal.is_some() {
                            tracing::debug!(%day, "ignoring ordinal prefix in weekly BYDAY");
                        }
                        day
                    })
                    .collect();
                RulePattern::Weekly { weekdays }
            }
            Frequency::Monthly => {
                let pattern = match (by_month_day, byday) {
                    (Some(day), _) => Some(MonthlyPattern::DayOfMonth(day)),
                    (None, Some(entries)) => match entries.as_slice() {
                        [(Some(-1), day)] => Some(MonthlyPattern::LastWeekday(*day)),
                        [(Some(n), day)] if *n >= 1 => {
                            Some(MonthlyPattern::NthWeekday(*n as u8, *day))
                        }
                        [(None, _)] => {
                            return Err(Error::MalformedRule(
                                "monthly BYDAY requires an ordinal prefix".into(),
                            ));
                        }
                        _ => {
                            return Err(Error::MalformedRule(
                                "monthly BYDAY takes a single ordinal weekday".into(),
                            ));
                        }
                    },
                    (None, None) => None,
                };
                RulePattern::Monthly { pattern }
            }
        };

        Ok(RecurrenceRule {
            pattern,
            interval: interval.unwrap_or(1),
            end,
        })
    }
}

// The wire form is the canonical serde representation, so rules embedded
// in snapshots and payloads stay interoperable with persisted rule
// strings.
impl serde::Serialize for RecurrenceRule {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for RecurrenceRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct RuleVisitor;

        impl de::Visitor<'_> for RuleVisitor {
            type Value = RecurrenceRule;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str(r#"a recurrence rule string like "FREQ=WEEKLY;BYDAY=MO,WE""#)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value.parse().map_err(|e: Error| de::Error::custom(e.to_string()))
            }
        }

        deserializer.deserialize_str(RuleVisitor)
    }
}

/// Parses one `BYDAY` entry: a 2-letter weekday code with an optional
/// signed ordinal prefix (`MO`, `2TU`, `-1FR`).
fn parse_byday_entry(entry: &str) -> Result<(Option<i8>, Weekday), Error> {
    let entry = entry.trim();
    let split = entry
        .len()
        .checked_sub(2)
        .ok_or_else(|| Error::MalformedRule(format!("invalid BYDAY entry {entry:?}")))?;
    let (prefix, code) = (
        entry
            .get(..split)
            .ok_or_else(|| Error::MalformedRule(format!("invalid BYDAY entry {entry:?}")))?,
        entry
            .get(split..)
            .ok_or_else(|| Error::MalformedRule(format!("invalid BYDAY entry {entry:?}")))?,
    );
    let day = code
        .parse::<Weekday>()
        .map_err(|_| Error::MalformedRule(format!("unknown weekday code {code:?}")))?;
    let ordinal = match prefix {
        "" => None,
        p => Some(p.parse::<i8>().map_err(|_| {
            Error::MalformedRule(format!("invalid BYDAY ordinal {p:?}"))
        })?),
    };
    Ok((ordinal, day))
}

/// Parses an `UNTIL` value: `YYYYMMDD` optionally followed by `THHMMSSZ`.
fn parse_until(value: &str) -> Result<NaiveDate, Error> {
    let malformed = || Error::MalformedRule(format!("invalid UNTIL value {value:?}"));
    let date_part = value.get(..8).ok_or_else(malformed)?;
    let rest = value.get(8..).ok_or_else(malformed)?;
    if !rest.is_empty() {
        let well_formed = rest.len() == 8
            && rest.starts_with('T')
            && rest.ends_with('Z')
            && rest.as_bytes()[1..7].iter().all(u8::is_ascii_digit);
        if !well_formed {
            return Err(malformed());
        }
    }
    NaiveDate::parse_from_str(date_part, "%Y%m%d").map_err(|_| malformed())
}
