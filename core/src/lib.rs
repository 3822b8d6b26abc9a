// SPDX-FileCopyrightText: 2026 Praxis contributors
//
// SPDX-License-Identifier: Apache-2.0

//! The scheduling core of the Praxis practice-management application.
//!
//! Everything in this crate is a pure, synchronous computation over its
//! inputs: expanding a recurrence rule into concrete occurrence intervals,
//! and deciding whether a proposed occurrence is admissible given clinician
//! availability windows and per-day appointment limits. Persistence, HTTP
//! handlers, and the UI are external collaborators that call into this
//! crate; it performs no I/O of its own.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro
)]

mod config;
mod duration;
mod error;
mod expand;
mod reconcile;
mod rule;
mod series;
mod types;
mod wallclock;

pub use crate::config::Config;
pub use crate::duration::format_duration;
pub use crate::error::Error;
pub use crate::expand::{DEFAULT_SCAN_COUNT, OccurrenceIter, ScanLimit, expand};
pub use crate::reconcile::{
    AdmissionObserver, BookingChannel, ReconciliationVerdict, Reconciler, VerdictReason,
};
pub use crate::rule::{Frequency, MonthlyPattern, RecurrenceRule, RuleEnd, RulePattern, Weekday};
pub use crate::series::{OccurrenceRecord, SeriesDraft, SeriesPlan, plan_series};
pub use crate::types::{
    Appointment, AvailabilityBlock, DailyLimit, Occurrence, ScheduleSnapshot, TimeInterval,
};
pub use crate::wallclock::{DayEdge, WallClock};
