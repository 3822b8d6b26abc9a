// SPDX-FileCopyrightText: 2026 Praxis contributors
//
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::rule::RecurrenceRule;

/// A pair of absolute instants, `end` strictly after `start`.
///
/// Instants are UTC-backed; the presentation timezone is a configuration
/// parameter ([`crate::WallClock`]), not a property of the interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    /// Start instant.
    pub start: DateTime<Utc>,
    /// End instant.
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    /// Creates an interval, rejecting `end <= start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, Error> {
        if end <= start {
            return Err(Error::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Elapsed time between the endpoints.
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Whether `other` lies entirely within this interval.
    pub fn contains(&self, other: &TimeInterval) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// One concrete scheduled interval generated from a (possibly recurring)
/// series.
///
/// Occurrences are produced by the expander and handed to the persistence
/// layer one row at a time; each row keeps a back-reference to its series
/// so "this/future/all" edits can select the right subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    /// The first, defining interval of the series.
    pub series_anchor: TimeInterval,
    /// This occurrence's own interval.
    pub interval: TimeInterval,
    /// Zero-based position within the series.
    pub sequence_index: u32,
}

/// A clinician-declared window during which appointments may be scheduled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityBlock {
    /// Owning clinician.
    pub clinician_id: String,
    /// The window itself (the anchor interval when recurring).
    pub interval: TimeInterval,
    /// Whether clients may book into this window through online requests.
    #[serde(default)]
    pub allow_online_requests: bool,
    /// Optional recurrence making this window repeat.
    #[serde(default)]
    pub recurrence: Option<RecurrenceRule>,
}

/// An admin-set cap on appointments per clinician per calendar day.
///
/// Limits are opt-in: a day with no record is unlimited. `Some(0)` blocks
/// the day entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyLimit {
    /// Clinician the cap applies to.
    pub clinician_id: String,
    /// Calendar day, in the configured display timezone.
    pub date: NaiveDate,
    /// Maximum appointments for the day; `None` means unlimited.
    #[serde(default)]
    pub max_appointments: Option<u32>,
}

/// An already-booked appointment, as counted against daily limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    /// Clinician the appointment belongs to.
    pub clinician_id: String,
    /// Booked interval.
    pub interval: TimeInterval,
}

/// In-memory snapshot of the schedule state the reconciler decides
/// against. Fetching and refreshing this state is the caller's business;
/// the reconciler never performs I/O.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    /// All availability blocks that may contain a proposed occurrence.
    #[serde(default)]
    pub availability: Vec<AvailabilityBlock>,
    /// All daily limit records in effect.
    #[serde(default)]
    pub limits: Vec<DailyLimit>,
    /// Already-booked appointments, counted against limits.
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}
