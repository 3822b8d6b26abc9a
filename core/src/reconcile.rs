// SPDX-FileCopyrightText: 2026 Praxis contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Deciding whether proposed occurrences may be booked.
//!
//! The reconciler is a pure function of a [`ScheduleSnapshot`]; it never
//! fetches state or writes anything. Callers that need side effects on
//! admission (persisting rows, pushing notifications) hook in through
//! [`AdmissionObserver`].

use serde::{Deserialize, Serialize};

use crate::expand::{ScanLimit, expand};
use crate::types::{AvailabilityBlock, Occurrence, ScheduleSnapshot, TimeInterval};
use crate::wallclock::WallClock;

/// Where a booking request originates. Staff bypass the online-request
/// flag on availability blocks; client-facing requests do not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingChannel {
    /// Booked by practice staff from the back office.
    #[default]
    Staff,
    /// Requested by a client through the online booking surface.
    Online,
}

/// Why an occurrence was rejected (or that it was not).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictReason {
    /// Admitted.
    Ok,
    /// No availability block contains the proposed interval.
    NoAvailability,
    /// The clinician's daily appointment cap is already met.
    LimitReached,
    /// The proposed start lies beyond the scan horizon.
    OutsideWindow,
}

/// The outcome of reconciling one proposed occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationVerdict {
    /// Whether the occurrence may be booked.
    pub admitted: bool,
    /// The first check that failed, or [`VerdictReason::Ok`].
    pub reason: VerdictReason,
}

impl ReconciliationVerdict {
    fn admit() -> Self {
        Self {
            admitted: true,
            reason: VerdictReason::Ok,
        }
    }

    fn reject(reason: VerdictReason) -> Self {
        Self {
            admitted: false,
            reason,
        }
    }
}

/// Callback invoked for each occurrence a series plan admits.
pub trait AdmissionObserver {
    /// Called once per admitted occurrence, in series order.
    fn on_admitted(&mut self, clinician_id: &str, occurrence: &Occurrence);
}

/// No-op observer for callers that only want the plan itself.
impl AdmissionObserver for () {
    fn on_admitted(&mut self, _clinician_id: &str, _occurrence: &Occurrence) {}
}

/// Decides occurrence admissibility against a schedule snapshot.
///
/// Checks run in a fixed order and the verdict reports the first failure:
/// daily limit, then scan horizon, then availability containment.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler {
    clock: WallClock,
    scan: ScanLimit,
}

impl Reconciler {
    /// Creates a reconciler over the given clock and scan bounds.
    pub fn new(clock: WallClock, scan: ScanLimit) -> Self {
        Self { clock, scan }
    }

    /// The reconciler's wall clock.
    pub fn clock(&self) -> &WallClock {
        &self.clock
    }

    /// The reconciler's scan bounds.
    pub fn scan(&self) -> ScanLimit {
        self.scan
    }

    /// Reconciles one proposed occurrence for a clinician.
    pub fn reconcile(
        &self,
        snapshot: &ScheduleSnapshot,
        clinician_id: &str,
        proposed: &Occurrence,
        channel: BookingChannel,
    ) -> ReconciliationVerdict {
        let date = self.clock.local_date(proposed.interval.start);

        let limit = snapshot
            .limits
            .iter()
            .find(|l| l.clinician_id == clinician_id && l.date == date);
        if let Some(limit) = limit
            && let Some(max) = limit.max_appointments
        {
            let booked = snapshot
                .appointments
                .iter()
                .filter(|a| {
                    a.clinician_id == clinician_id
                        && self.clock.local_date(a.interval.start) == date
                })
                .count();
            if booked >= max as usize {
                return ReconciliationVerdict::reject(VerdictReason::LimitReached);
            }
        }

        if proposed.interval.start > self.scan.max_date {
            return ReconciliationVerdict::reject(VerdictReason::OutsideWindow);
        }

        let contained = snapshot
            .availability
            .iter()
            .filter(|block| block.clinician_id == clinician_id)
            .filter(|block| channel == BookingChannel::Staff || block.allow_online_requests)
            .any(|block| self.block_contains(block, &proposed.interval));
        if !contained {
            return ReconciliationVerdict::reject(VerdictReason::NoAvailability);
        }

        ReconciliationVerdict::admit()
    }

    /// Whether any concrete window of an availability block contains the
    /// proposed interval. Recurring blocks are expanded only as far as the
    /// proposal's end.
    fn block_contains(&self, block: &AvailabilityBlock, proposed: &TimeInterval) -> bool {
        match &block.recurrence {
            None => block.interval.contains(proposed),
            Some(rule) => {
                let scan = ScanLimit::new(self.scan.max_count, proposed.end);
                match expand(block.interval, Some(rule), scan, &self.clock) {
                    Ok(mut windows) => windows.any(|w| w.interval.contains(proposed)),
                    Err(e) => {
                        tracing::warn!(
                            clinician_id = %block.clinician_id,
                            error = %e,
                            "skipping availability block with bad recurrence"
                        );
                        false
                    }
                }
            }
        }
    }
}
