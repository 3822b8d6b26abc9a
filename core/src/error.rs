// SPDX-FileCopyrightText: 2026 Praxis contributors
//
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};

/// Errors produced by the scheduling engine.
///
/// Every variant is recoverable by the caller; none is fatal to the
/// process. Construction-time failures (`InvalidInterval`,
/// `InvalidRecurrence`) are surfaced before any occurrence is generated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A time string matched neither the 12-hour nor the 24-hour grammar.
    /// Callers should re-prompt for input, never silently default.
    #[error("invalid time format: {0:?}")]
    InvalidTimeFormat(String),

    /// A recurrence rule string could not be parsed. Callers should treat
    /// the series as non-recurring and log the anomaly.
    #[error("malformed recurrence rule: {0}")]
    MalformedRule(String),

    /// An interval whose end does not come after its start.
    #[error("invalid interval: end {end} is not after start {start}")]
    InvalidInterval {
        /// Start of the rejected interval.
        start: DateTime<Utc>,
        /// End of the rejected interval.
        end: DateTime<Utc>,
    },

    /// A recurrence rule that cannot produce a well-defined series.
    #[error("invalid recurrence: {0}")]
    InvalidRecurrence(String),
}
